// src/guichet/taux.rs
//
// Cotations de la Banque de Taïwan via FinMind (jeu de données
// TaiwanExchangeRate). Source : https://api.finmindtrade.com
//
// L'API rend parfois des nombres, parfois des chaînes ("-" quand le taux
// n'est pas coté) : la lecture est volontairement tolérante, 0.0 à défaut.

use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use crate::pont::protocole::TypeTaux;

pub const URL_FINMIND: &str = "https://api.finmindtrade.com/api/v4/data";
pub const JEU_DE_DONNEES: &str = "TaiwanExchangeRate";

/// Délai réseau par requête.
const DELAI_HTTP: Duration = Duration::from_secs(10);

/// Fenêtre de rattrapage pour « dernière cotation » (l'API publie avec
/// du retard les week-ends et jours fériés).
const JOURS_RATTRAPAGE: u64 = 7;

/// Devises cotées (code ISO, nom).
pub const DEVISES_SUPPORTEES: &[(&str, &str)] = &[
    ("AUD", "dollar australien"),
    ("CAD", "dollar canadien"),
    ("CHF", "franc suisse"),
    ("CNY", "yuan"),
    ("EUR", "euro"),
    ("GBP", "livre sterling"),
    ("HKD", "dollar de Hong Kong"),
    ("IDR", "roupie indonésienne"),
    ("JPY", "yen"),
    ("KRW", "won"),
    ("MYR", "ringgit"),
    ("NZD", "dollar néo-zélandais"),
    ("PHP", "peso philippin"),
    ("SEK", "couronne suédoise"),
    ("SGD", "dollar de Singapour"),
    ("THB", "baht"),
    ("USD", "dollar américain"),
    ("VND", "dông"),
    ("ZAR", "rand"),
];

pub fn nom_devise(code: &str) -> Option<&'static str> {
    DEVISES_SUPPORTEES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, nom)| *nom)
}

pub fn devise_supportee(code: &str) -> bool {
    nom_devise(code).is_some()
}

/// Cotation d'un jour pour une devise, en TWD.
#[derive(Debug, Clone, PartialEq)]
pub struct CotationJour {
    pub date: String,
    pub devise: String,
    pub cash_buy: f64,
    pub cash_sell: f64,
    pub spot_buy: f64,
    pub spot_sell: f64,
}

impl CotationJour {
    pub fn taux(&self, type_taux: TypeTaux) -> f64 {
        match type_taux {
            TypeTaux::CashBuy => self.cash_buy,
            TypeTaux::CashSell => self.cash_sell,
            TypeTaux::SpotBuy => self.spot_buy,
            TypeTaux::SpotSell => self.spot_sell,
        }
    }
}

#[derive(Debug, Error)]
pub enum ErreurTaux {
    #[error("aucune cotation pour {0}")]
    AucuneCotation(String),

    #[error("requête FinMind : {0}")]
    Reseau(#[from] reqwest::Error),
}

pub struct ClientTaux {
    http: reqwest::blocking::Client,
    jeton: Option<String>,
}

impl ClientTaux {
    /// Le jeton FinMind est optionnel (`FINMINDTRADE_API_KEY`) ; sans lui
    /// l'API publique répond avec un quota réduit.
    pub fn nouveau() -> Self {
        let jeton = std::env::var("FINMINDTRADE_API_KEY")
            .ok()
            .filter(|j| !j.is_empty());

        let http = reqwest::blocking::Client::builder()
            .timeout(DELAI_HTTP)
            .build()
            .expect("client HTTP");

        Self { http, jeton }
    }

    /// Cotations jour par jour sur [debut, fin], ordre chronologique.
    /// Une fenêtre sans données rend une liste vide (pas une erreur).
    pub fn cotations(
        &self,
        devise: &str,
        debut: NaiveDate,
        fin: NaiveDate,
    ) -> Result<Vec<CotationJour>, ErreurTaux> {
        let code = devise.to_uppercase();
        let debut = debut.format("%Y-%m-%d").to_string();
        let fin = fin.format("%Y-%m-%d").to_string();

        let mut requete = self.http.get(URL_FINMIND).query(&[
            ("dataset", JEU_DE_DONNEES),
            ("data_id", code.as_str()),
            ("start_date", debut.as_str()),
            ("end_date", fin.as_str()),
        ]);
        if let Some(jeton) = &self.jeton {
            requete = requete.bearer_auth(jeton);
        }

        let corps: Value = requete.send()?.error_for_status()?.json()?;

        let Some(lignes) = corps.get("data").and_then(Value::as_array) else {
            log::warn!("FinMind sans champ data pour {code}");
            return Ok(Vec::new());
        };

        Ok(lignes.iter().map(cotation_depuis).collect())
    }

    /// Dernière cotation connue (fenêtre de rattrapage de 7 jours).
    pub fn derniere_cotation(&self, devise: &str) -> Result<CotationJour, ErreurTaux> {
        let fin = aujourdhui();
        let debut = fin - Days::new(JOURS_RATTRAPAGE);

        let mut cotations = self.cotations(devise, debut, fin)?;
        cotations
            .pop()
            .ok_or_else(|| ErreurTaux::AucuneCotation(devise.to_uppercase()))
    }

    /// Historique des `jours` derniers jours.
    pub fn historique(&self, devise: &str, jours: u64) -> Result<Vec<CotationJour>, ErreurTaux> {
        let fin = aujourdhui();
        let debut = fin - Days::new(jours);
        self.cotations(devise, debut, fin)
    }
}

fn aujourdhui() -> NaiveDate {
    Local::now().date_naive()
}

fn cotation_depuis(v: &Value) -> CotationJour {
    CotationJour {
        date: texte(v, "date"),
        devise: texte(v, "currency"),
        cash_buy: nombre_souple(v.get("cash_buy")),
        cash_sell: nombre_souple(v.get("cash_sell")),
        spot_buy: nombre_souple(v.get("spot_buy")),
        spot_sell: nombre_souple(v.get("spot_sell")),
    }
}

fn texte(v: &Value, champ: &str) -> String {
    v.get(champ)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Coercition tolérante vers f64 : nombre tel quel, chaîne re-parsée,
/// tout le reste (absent, "-", null) vaut 0.0.
fn nombre_souple(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
