// src/guichet/agent.rs
//
// Le guichetier : règles de change, conversions TWD <-> devises et
// petites questions en langage naturel (appariement par mots-clés, le
// chemin de repli historique — l'analyse par LLM vit hors de ce dépôt).
//
// `traite` est la table de dispatch du serveur : une Requete entre, une
// enveloppe JSON sort, y compris pour les échecs.

use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use serde_json::{json, Value};

use super::taux::{nom_devise, ClientTaux, CotationJour, ErreurTaux, DEVISES_SUPPORTEES};
use crate::pont::protocole::{enveloppe_erreur, InfoTaux, ReponseCalcul, Requete, TypeTaux};

/* ------------------------ Règles de la banque ------------------------ */

#[derive(Debug, Clone, Copy)]
pub struct Limite {
    pub devise: &'static str,
    pub nom: &'static str,
    /// Plafond journalier, en devise, à l'achat.
    pub plafond: f64,
}

pub const LIMITES_BANQUE: &[Limite] = &[
    Limite { devise: "USD", nom: "dollar américain", plafond: 50_000.0 },
    Limite { devise: "EUR", nom: "euro", plafond: 30_000.0 },
    Limite { devise: "JPY", nom: "yen", plafond: 5_000_000.0 },
    Limite { devise: "CNY", nom: "yuan", plafond: 200_000.0 },
    Limite { devise: "GBP", nom: "livre sterling", plafond: 20_000.0 },
    Limite { devise: "AUD", nom: "dollar australien", plafond: 30_000.0 },
    Limite { devise: "HKD", nom: "dollar de Hong Kong", plafond: 200_000.0 },
    Limite { devise: "SGD", nom: "dollar de Singapour", plafond: 30_000.0 },
];

fn limite(code: &str) -> Option<&'static Limite> {
    LIMITES_BANQUE.iter().find(|l| l.devise == code)
}

/// Montant obtenu pour `montant_twd` : à l'achat on divise (la banque
/// vend la devise à son prix de vente), à la vente on multiplie.
/// Arrondi bancaire classique à 2 décimales.
pub fn montant_converti(taux: f64, montant_twd: f64, achat: bool) -> f64 {
    let brut = if achat {
        montant_twd / taux
    } else {
        montant_twd * taux
    };
    (brut * 100.0).round() / 100.0
}

/// Avertissement de plafond : uniquement à l'achat, uniquement pour les
/// devises à règle.
pub fn avertissement_plafond(code: &str, montant: f64, achat: bool) -> Option<String> {
    if !achat {
        return None;
    }
    let l = limite(code)?;
    (montant > l.plafond).then(|| {
        format!(
            "attention : {montant:.2} {code} dépasse le plafond journalier de {:.0} {code}",
            l.plafond
        )
    })
}

/* ------------------------ Langage naturel (mots-clés) ------------------------ */

/// Noms et surnoms reconnus dans une question, par code.
/// L'appariement prend le plus long qui colle : « dollar australien »
/// gagne sur « dollar ».
const ALIAS_DEVISES: &[(&str, &[&str])] = &[
    ("USD", &["dollar américain", "dollars américains", "dollar us", "dollars", "dollar"]),
    ("EUR", &["euros", "euro"]),
    ("JPY", &["yens", "yen"]),
    ("CNY", &["yuans", "yuan", "renminbi"]),
    ("GBP", &["livres sterling", "livre sterling", "livres", "livre"]),
    ("AUD", &["dollar australien", "dollars australiens"]),
    ("HKD", &["dollar de hong kong", "dollars de hong kong"]),
    ("SGD", &["dollar de singapour", "dollars de singapour"]),
    ("CHF", &["francs suisses", "franc suisse"]),
    ("CAD", &["dollar canadien", "dollars canadiens"]),
    ("KRW", &["wons", "won"]),
    ("THB", &["bahts", "baht"]),
];

/// Ce que le guichetier a compris d'une question.
#[derive(Debug, Clone, PartialEq)]
pub enum Intention {
    /// « taux du yen ? »
    Taux(String),
    /// « 10000 TWD en yens » : combien de devise pour ce montant TWD.
    Change { devise: String, montant_twd: f64 },
    /// « je veux 500 euros » : combien de TWD pour ce montant de devise.
    BesoinTwd { devise: String, montant_devise: f64 },
    /// « tendance du yen ? » : taux courant contre les jours récents.
    Tendance(String),
    /// « plafond pour le yen ? »
    Regles(Option<String>),
    /// Rien de reconnu : on se présente.
    Accueil,
    /// Il manque la devise ou le montant.
    Preciser(String),
}

/// Analyse par mots-clés, pure (testable sans réseau).
pub fn interprete(question: &str) -> Intention {
    let q = question.to_lowercase();
    let devise = trouve_devise(&q);

    // 0) tendance / conseil (avant « taux » : « tendance du taux du yen »)
    if q.contains("tendance") || q.contains("conseil") || q.contains("évolution") {
        if let Some(code) = devise {
            return Intention::Tendance(code);
        }
        return Intention::Preciser(
            "De quelle devise voulez-vous la tendance ? Ex : « tendance du yen ? »".into(),
        );
    }

    // 1) taux / cours
    if q.contains("taux") || q.contains("cours") {
        if let Some(code) = devise {
            return Intention::Taux(code);
        }
        return Intention::Preciser(
            "De quelle devise voulez-vous le taux ? Ex : « taux du yen ? »".into(),
        );
    }

    // 2) conversion
    if q.contains("chang") || q.contains("convert") || q.contains("combien") || q.contains("veux")
    {
        let Some(code) = devise else {
            return Intention::Preciser(
                "Quelle devise voulez-vous changer ? Ex : « 10000 TWD en yens »".into(),
            );
        };

        let mention_twd = q.contains("twd") || q.contains("nt$") || q.contains("taïwan");

        // montant collé au nom de la devise et pas de TWD explicite :
        // l'usager veut CE montant de devise (sens inverse)
        if let Some(montant) = montant_adjacent(&q, &code) {
            if !mention_twd {
                return Intention::BesoinTwd {
                    devise: code,
                    montant_devise: montant,
                };
            }
        }

        let Some(montant) = premier_montant(&q) else {
            return Intention::Preciser(format!(
                "Quel montant ? Ex : « 10000 TWD en {} »",
                nom_devise(&code).unwrap_or("devises")
            ));
        };
        return Intention::Change {
            devise: code,
            montant_twd: montant,
        };
    }

    // 3) règles / plafonds
    if q.contains("plafond") || q.contains("limite") || q.contains("règle") || q.contains("regle")
    {
        return Intention::Regles(devise);
    }

    Intention::Accueil
}

fn alias_pour(code: &str) -> Option<&'static [&'static str]> {
    ALIAS_DEVISES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, alias)| *alias)
}

fn trouve_devise(q: &str) -> Option<String> {
    let mut meilleur: Option<(&str, usize)> = None;

    for (code, alias) in ALIAS_DEVISES {
        for a in *alias {
            if q.contains(a) && meilleur.is_none_or(|(_, l)| a.len() > l) {
                meilleur = Some((code, a.len()));
            }
        }
    }
    if let Some((code, _)) = meilleur {
        return Some(code.to_string());
    }

    // repli : code ISO cité tel quel (« taux du ZAR ? »)
    DEVISES_SUPPORTEES
        .iter()
        .find(|(code, _)| q.contains(&code.to_lowercase()))
        .map(|(code, _)| (*code).to_string())
}

/// Montant immédiatement suivi du nom de la devise (« 500 euros »).
fn montant_adjacent(q: &str, code: &str) -> Option<f64> {
    let mut candidats: Vec<&str> = alias_pour(code).map(|a| a.to_vec()).unwrap_or_default();
    let code_bas = code.to_lowercase();
    candidats.push(&code_bas);

    for alias in candidats {
        let motif = format!(r"(\d[\d\s]*(?:[.,]\d+)?)\s*(?:{})", regex::escape(alias));
        let Ok(re) = Regex::new(&motif) else { continue };
        if let Some(cap) = re.captures(q) {
            return lit_montant(cap.get(1)?.as_str());
        }
    }
    None
}

/// Premier nombre de la question (« 10 000 », « 2500,50 »).
fn premier_montant(q: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d[\d\s]*(?:[.,]\d+)?").expect("regex montant"));
    lit_montant(re.find(q)?.as_str())
}

fn lit_montant(brut: &str) -> Option<f64> {
    let propre: String = brut
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    propre.parse().ok()
}

/* ------------------------ Le guichetier ------------------------ */

pub struct Guichetier {
    taux: ClientTaux,
}

impl Default for Guichetier {
    fn default() -> Self {
        Self::nouveau()
    }
}

impl Guichetier {
    pub fn nouveau() -> Self {
        Self {
            taux: ClientTaux::nouveau(),
        }
    }

    /// Table de dispatch du serveur : une enveloppe JSON par requête,
    /// échecs compris.
    pub fn traite(&self, requete: &Requete) -> Value {
        match requete {
            Requete::ExchangeRate {
                currency,
                rate_type,
            } => self.taux_de_change(currency, *rate_type),
            Requete::CalculateExchange {
                currency,
                twd_amount,
                is_buying,
            } => self.calcule_change(currency, *twd_amount, *is_buying),
            Requete::GetMultipleRates { currencies } => self.taux_multiples(currencies),
            Requete::GetBankRules { currency } => self.regles_banque(currency.as_deref()),
            Requete::BankAgentInfo => json!({ "success": true, "info": self.presentation() }),
            Requete::AiChat { query } => self.repond(query),
        }
    }

    fn info_taux(&self, devise: &str, type_taux: TypeTaux) -> Result<InfoTaux, ErreurTaux> {
        let code = devise.to_uppercase();
        let cotation = self.taux.derniere_cotation(&code)?;

        Ok(InfoTaux {
            success: true,
            currency: code,
            date: cotation.date.clone(),
            cash_buy: cotation.cash_buy,
            cash_sell: cotation.cash_sell,
            spot_buy: cotation.spot_buy,
            spot_sell: cotation.spot_sell,
            selected_rate: cotation.taux(type_taux),
            rate_type: Some(type_taux),
            error: None,
        })
    }

    pub fn taux_de_change(&self, devise: &str, type_taux: TypeTaux) -> Value {
        match self.info_taux(devise, type_taux) {
            Ok(info) => serde_json::to_value(&info)
                .unwrap_or_else(|e| enveloppe_erreur(e.to_string())),
            Err(e) => json!({
                "success": false,
                "error": e.to_string(),
                "currency": devise.to_uppercase(),
            }),
        }
    }

    fn calcul(
        &self,
        devise: &str,
        montant_twd: f64,
        achat: bool,
    ) -> Result<ReponseCalcul, String> {
        // acheter la devise = prix de vente de la banque, et inversement
        let type_taux = if achat {
            TypeTaux::CashSell
        } else {
            TypeTaux::CashBuy
        };

        let info = self.info_taux(devise, type_taux).map_err(|e| e.to_string())?;
        let taux = info.selected_rate;
        if taux <= 0.0 {
            return Err(format!("taux « {type_taux} » non coté pour {}", info.currency));
        }

        let montant = montant_converti(taux, montant_twd, achat);

        Ok(ReponseCalcul {
            success: true,
            warning: avertissement_plafond(&info.currency, montant, achat),
            currency: info.currency,
            twd_amount: montant_twd,
            foreign_amount: montant,
            rate: taux,
            rate_type: Some(type_taux),
            operation: if achat { "achat" } else { "vente" }.to_string(),
            date: info.date,
            error: None,
        })
    }

    pub fn calcule_change(&self, devise: &str, montant_twd: f64, achat: bool) -> Value {
        match self.calcul(devise, montant_twd, achat) {
            Ok(r) => serde_json::to_value(&r).unwrap_or_else(|e| enveloppe_erreur(e.to_string())),
            Err(message) => enveloppe_erreur(message),
        }
    }

    pub fn taux_multiples(&self, devises: &[String]) -> Value {
        let mut taux = serde_json::Map::new();
        for devise in devises {
            let code = devise.to_uppercase();
            let v = self.taux_de_change(&code, TypeTaux::CashSell);
            taux.insert(code, v);
        }

        json!({
            "success": true,
            "rates": taux,
            "timestamp": Local::now().to_rfc3339(),
        })
    }

    pub fn regles_banque(&self, devise: Option<&str>) -> Value {
        match devise {
            Some(code) => {
                let code = code.to_uppercase();
                let regles = match limite(&code) {
                    Some(l) => json!({ "name": l.nom, "max_amount": l.plafond }),
                    None => json!({ "error": "devise sans règle de change" }),
                };
                json!({ "success": true, "currency": code, "rules": regles })
            }
            None => json!({ "success": true, "all_rules": regles_valeur() }),
        }
    }

    pub fn presentation(&self) -> Value {
        json!({
            "role": "guichetier",
            "description": "guichetier de change : cotations du jour et conversions TWD <-> devises",
            "supported_currencies": DEVISES_SUPPORTEES.iter().map(|(code, _)| *code).collect::<Vec<_>>(),
            "bank_rules": regles_valeur(),
            "services": [
                "cotation du jour",
                "conversion de montants",
                "comparaison multi-devises",
                "plafonds et règles de change",
            ],
        })
    }

    /// Répond à une question en langage naturel (chemin mots-clés).
    pub fn repond(&self, question: &str) -> Value {
        match interprete(question) {
            Intention::Taux(code) => match self.info_taux(&code, TypeTaux::CashSell) {
                Ok(info) => {
                    let nom = nom_devise(&info.currency).unwrap_or("devise");
                    json!({
                        "success": true,
                        "type": "rate_info",
                        "message": format!(
                            "Cotation {nom} ({}) du {}\n\nachat billets : {} TWD\nvente billets : {} TWD\n\nPour acheter la devise, la banque applique son prix de vente.",
                            info.currency, info.date, info.cash_buy, info.cash_sell
                        ),
                        "data": info,
                    })
                }
                Err(e) => enveloppe_erreur(e.to_string()),
            },

            Intention::Change { devise, montant_twd } => {
                match self.calcul(&devise, montant_twd, true) {
                    Ok(r) => {
                        let mut message = format!(
                            "Conversion\n\nMontant TWD : NT$ {:.0}\nMontant obtenu : {:.2} {}\nTaux appliqué (vente billets) : {}\nDate : {}",
                            r.twd_amount, r.foreign_amount, r.currency, r.rate, r.date
                        );
                        if let Some(avertissement) = &r.warning {
                            message.push_str(&format!("\n⚠️ {avertissement}"));
                        }
                        json!({
                            "success": true,
                            "type": "calculation",
                            "message": message,
                            "data": r,
                        })
                    }
                    Err(message) => enveloppe_erreur(message),
                }
            }

            Intention::BesoinTwd {
                devise,
                montant_devise,
            } => match self.info_taux(&devise, TypeTaux::CashSell) {
                Ok(info) if info.cash_sell > 0.0 => {
                    let twd = montant_devise * info.cash_sell;
                    json!({
                        "success": true,
                        "type": "reverse_calculation",
                        "message": format!(
                            "Conversion\n\nMontant souhaité : {montant_devise:.2} {}\nTWD nécessaires : NT$ {twd:.2}\nTaux appliqué (vente billets) : {}\nDate : {}",
                            info.currency, info.cash_sell, info.date
                        ),
                        "data": {
                            "foreign_amount": montant_devise,
                            "currency": info.currency,
                            "twd_needed": twd,
                            "rate": info.cash_sell,
                            "date": info.date,
                        },
                    })
                }
                Ok(info) => enveloppe_erreur(format!(
                    "taux « vente billets » non coté pour {}",
                    info.currency
                )),
                Err(e) => enveloppe_erreur(e.to_string()),
            },

            Intention::Tendance(code) => match self.taux.historique(&code, 7) {
                Ok(historique) => match tendance_depuis(&historique) {
                    Some((courant, moyenne, sens)) => {
                        let nom = nom_devise(&code).unwrap_or("devise");
                        let conseil = match sens {
                            "en hausse" => "Le taux est au-dessus de sa moyenne : patienter peut payer.",
                            "en baisse" => "Le taux est sous sa moyenne : moment plutôt favorable pour changer.",
                            _ => "Le taux est étale ces derniers jours.",
                        };
                        json!({
                            "success": true,
                            "type": "advice",
                            "message": format!(
                                "Tendance {nom} ({code})\n\nTaux courant (vente billets) : {courant}\nMoyenne des derniers jours : {moyenne:.3}\nTendance : {sens}\n\n{conseil}"
                            ),
                            "data": {
                                "currency": code,
                                "current_rate": courant,
                                "average": moyenne,
                                "trend": sens,
                            },
                        })
                    }
                    None => enveloppe_erreur(format!("pas assez de cotations pour {code}")),
                },
                Err(e) => enveloppe_erreur(e.to_string()),
            },

            Intention::Regles(code) => json!({
                "success": true,
                "type": "rules",
                "message": message_regles(code.as_deref()),
                "data": self.regles_banque(code.as_deref()),
            }),

            Intention::Preciser(message) => json!({
                "success": true,
                "type": "clarify",
                "message": message,
            }),

            Intention::Accueil => json!({
                "success": true,
                "message": "Bonjour ! Je suis le guichetier de change.\n\nVous pouvez me demander :\n• « taux du dollar américain ? »\n• « 10000 TWD en yens »\n• « je veux 500 euros »\n• « plafond pour le yen ? »",
            }),
        }
    }
}

/// Sens du taux de vente : dernier jour coté contre la moyenne des trois
/// jours cotés précédents. None s'il manque de quoi comparer.
fn tendance_depuis(historique: &[CotationJour]) -> Option<(f64, f64, &'static str)> {
    let (dernier, avant) = historique.split_last()?;

    let courant = dernier.cash_sell;
    if courant <= 0.0 {
        return None;
    }

    let recents: Vec<f64> = avant
        .iter()
        .rev()
        .map(|c| c.cash_sell)
        .filter(|v| *v > 0.0)
        .take(3)
        .collect();
    if recents.is_empty() {
        return None;
    }
    let moyenne = recents.iter().sum::<f64>() / recents.len() as f64;

    let sens = if courant > moyenne {
        "en hausse"
    } else if courant < moyenne {
        "en baisse"
    } else {
        "stable"
    };

    Some((courant, moyenne, sens))
}

fn regles_valeur() -> Value {
    let mut m = serde_json::Map::new();
    for l in LIMITES_BANQUE {
        m.insert(
            l.devise.to_string(),
            json!({ "name": l.nom, "max_amount": l.plafond }),
        );
    }
    Value::Object(m)
}

fn message_regles(code: Option<&str>) -> String {
    match code.and_then(limite) {
        Some(l) => format!(
            "Règles de change — {}\n\nPlafond journalier : {:.0} {}\nAu-delà, réservation préalable au comptoir.",
            l.nom, l.plafond, l.devise
        ),
        None => {
            let mut lignes = vec!["Plafonds journaliers par devise :".to_string()];
            for l in LIMITES_BANQUE {
                lignes.push(format!("• {} : {:.0} {}", l.nom, l.plafond, l.devise));
            }
            lignes.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- conversions pures ---

    #[test]
    fn montant_converti_achat_et_vente() {
        // 10000 TWD à 31.25 => 320 USD
        assert_eq!(montant_converti(31.25, 10_000.0, true), 320.0);
        // vendre 100 unités de devise à 30.0 => 3000 TWD
        assert_eq!(montant_converti(30.0, 100.0, false), 3000.0);
        // arrondi à 2 décimales
        assert_eq!(montant_converti(3.0, 100.0, true), 33.33);
    }

    #[test]
    fn plafond_franchi_seulement_a_l_achat() {
        assert!(avertissement_plafond("USD", 60_000.0, true).is_some());
        assert!(avertissement_plafond("USD", 40_000.0, true).is_none());
        assert!(avertissement_plafond("USD", 60_000.0, false).is_none());
        // devise sans règle : jamais d'avertissement
        assert!(avertissement_plafond("ZAR", 1e9, true).is_none());
    }

    // --- interprétation des questions ---

    #[test]
    fn question_taux() {
        assert_eq!(
            interprete("Quel est le taux du dollar américain ?"),
            Intention::Taux("USD".into())
        );
        assert_eq!(interprete("cours du yen"), Intention::Taux("JPY".into()));
        assert_eq!(interprete("taux du ZAR ?"), Intention::Taux("ZAR".into()));
        assert!(matches!(interprete("le taux ?"), Intention::Preciser(_)));
    }

    #[test]
    fn question_change_depuis_twd() {
        assert_eq!(
            interprete("je veux changer 10000 TWD en yens"),
            Intention::Change {
                devise: "JPY".into(),
                montant_twd: 10_000.0,
            }
        );
        assert_eq!(
            interprete("combien d'euros pour 10 000 TWD ?"),
            Intention::Change {
                devise: "EUR".into(),
                montant_twd: 10_000.0,
            }
        );
    }

    #[test]
    fn question_change_vers_devise() {
        // le montant colle au nom de la devise : sens inverse
        assert_eq!(
            interprete("je veux 500 euros"),
            Intention::BesoinTwd {
                devise: "EUR".into(),
                montant_devise: 500.0,
            }
        );
        assert_eq!(
            interprete("changer 150000 yens"),
            Intention::BesoinTwd {
                devise: "JPY".into(),
                montant_devise: 150_000.0,
            }
        );
    }

    #[test]
    fn question_tendance() {
        assert_eq!(
            interprete("tendance du yen ?"),
            Intention::Tendance("JPY".into())
        );
        // « tendance du taux » ne doit pas tomber dans la branche taux
        assert_eq!(
            interprete("tendance du taux de l'euro"),
            Intention::Tendance("EUR".into())
        );
        assert!(matches!(interprete("une tendance ?"), Intention::Preciser(_)));
    }

    #[test]
    fn question_regles() {
        assert_eq!(
            interprete("plafond pour le yen ?"),
            Intention::Regles(Some("JPY".into()))
        );
        assert_eq!(interprete("quelles limites ?"), Intention::Regles(None));
    }

    #[test]
    fn question_inconnue() {
        assert_eq!(interprete("bonjour"), Intention::Accueil);
        assert!(matches!(
            interprete("changer de l'argent"),
            Intention::Preciser(_)
        ));
    }

    #[test]
    fn alias_le_plus_long_gagne() {
        // « dollar australien » doit battre « dollar »
        assert_eq!(
            interprete("taux du dollar australien"),
            Intention::Taux("AUD".into())
        );
        assert_eq!(interprete("taux du dollar"), Intention::Taux("USD".into()));
    }

    #[test]
    fn lecture_des_montants() {
        assert_eq!(lit_montant("10 000"), Some(10_000.0));
        assert_eq!(lit_montant("2500,50"), Some(2500.50));
        assert_eq!(premier_montant("environ 1 200 TWD"), Some(1200.0));
        assert_eq!(premier_montant("aucun chiffre"), None);
    }

    // --- tendance ---

    fn cotation(date: &str, cash_sell: f64) -> CotationJour {
        CotationJour {
            date: date.into(),
            devise: "USD".into(),
            cash_buy: cash_sell - 0.5,
            cash_sell,
            spot_buy: 0.0,
            spot_sell: 0.0,
        }
    }

    #[test]
    fn tendance_hausse_baisse_et_donnees_minces() {
        let hausse = [
            cotation("2024-01-08", 31.0),
            cotation("2024-01-09", 31.1),
            cotation("2024-01-10", 31.2),
            cotation("2024-01-11", 31.8),
        ];
        let (courant, moyenne, sens) = tendance_depuis(&hausse).unwrap();
        assert_eq!(courant, 31.8);
        assert!(moyenne < courant);
        assert_eq!(sens, "en hausse");

        let baisse = [
            cotation("2024-01-09", 31.8),
            cotation("2024-01-10", 31.6),
            cotation("2024-01-11", 30.9),
        ];
        assert_eq!(tendance_depuis(&baisse).unwrap().2, "en baisse");

        // un seul jour coté : rien à comparer
        assert!(tendance_depuis(&[cotation("2024-01-11", 31.0)]).is_none());
        assert!(tendance_depuis(&[]).is_none());

        // les jours non cotés (0.0) sont ignorés dans la moyenne
        let troue = [
            cotation("2024-01-09", 31.0),
            cotation("2024-01-10", 0.0),
            cotation("2024-01-11", 32.0),
        ];
        let (_, moyenne, sens) = tendance_depuis(&troue).unwrap();
        assert_eq!(moyenne, 31.0);
        assert_eq!(sens, "en hausse");
    }

    // --- dispatch sans réseau ---

    #[test]
    fn traite_presentation() {
        let guichetier = Guichetier::nouveau();
        let v = guichetier.traite(&Requete::BankAgentInfo);
        assert_eq!(v["success"], true);
        assert_eq!(v["info"]["role"], "guichetier");
        assert!(v["info"]["supported_currencies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "USD"));
    }

    #[test]
    fn traite_regles() {
        let guichetier = Guichetier::nouveau();

        let v = guichetier.traite(&Requete::GetBankRules {
            currency: Some("jpy".into()),
        });
        assert_eq!(v["success"], true);
        assert_eq!(v["currency"], "JPY");
        assert_eq!(v["rules"]["max_amount"], 5_000_000.0);

        let v = guichetier.traite(&Requete::GetBankRules { currency: None });
        assert_eq!(v["all_rules"]["USD"]["max_amount"], 50_000.0);

        let v = guichetier.traite(&Requete::GetBankRules {
            currency: Some("XXX".into()),
        });
        assert!(v["rules"]["error"].is_string());
    }

    #[test]
    fn message_regles_par_devise_ou_global() {
        let m = message_regles(Some("JPY"));
        assert!(m.contains("yen"));
        assert!(m.contains("5000000") || m.contains("5 000 000"));

        let m = message_regles(None);
        for l in LIMITES_BANQUE {
            assert!(m.contains(l.devise), "devise absente du récapitulatif : {}", l.devise);
        }
    }
}
