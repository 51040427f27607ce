//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l'état de la calculatrice (affichage, équation en
//! cours, panneau guichet, fil de discussion) et offrir des transitions
//! simples, sans logique d'affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, pas de parsing d'expression).
//! - Transitions déterministes, sans effet de bord caché.
//! - Le pont (processus serveur) est de la plomberie d'état : les
//!   réponses sont relevées sans bloquer, jamais attendues.

use std::process::Command;
use std::sync::mpsc::TryRecvError;

use serde_json::Value;

use crate::pont::client::{ErreurPont, Livraison, Pont};
use crate::pont::protocole::{InfoTaux, ReponseCalcul, ReponseChat, Requete, TypeTaux};

/// Écran au repos.
pub const AFFICHAGE_DEFAUT: &str = "0";

/// Sélection de départ du panneau guichet.
pub const DEVISE_DEFAUT: &str = "USD";
pub const MONTANT_DEFAUT: &str = "1000";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreMessage {
    Systeme,
    Guichetier,
    Usager,
    /// Bulle provisoire pendant qu'une question est au serveur.
    Reflexion,
}

#[derive(Clone, Debug)]
pub struct MessageChat {
    pub genre: GenreMessage,
    pub contenu: String,
}

/// Ce qu'on attend du serveur, pour router la réponse (le fil est FIFO,
/// c'est donc à nous de nous souvenir de ce qu'on a demandé).
#[derive(Clone, Copy, Debug)]
enum Attendu {
    Taux,
    Calcul,
    Chat,
}

struct Attente {
    attendu: Attendu,
    livraison: Livraison,
}

pub struct AppCalc {
    // --- calculatrice ---
    pub affichage: String,
    pub equation: String,

    // --- panneau guichet ---
    pub mode_guichet: bool,
    pub devise: String,
    pub montant_twd: String,
    pub taux_courant: Option<InfoTaux>,
    pub messages: Vec<MessageChat>,
    pub saisie_chat: String,

    // --- plomberie pont ---
    pont: Option<Pont>,
    en_attente: Vec<Attente>,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            affichage: AFFICHAGE_DEFAUT.to_string(),
            equation: String::new(),
            mode_guichet: false,
            devise: DEVISE_DEFAUT.to_string(),
            montant_twd: MONTANT_DEFAUT.to_string(),
            taux_courant: None,
            messages: vec![MessageChat {
                genre: GenreMessage::Systeme,
                contenu: "Guichetier prêt : cotations du jour et conversions TWD ↔ devises."
                    .into(),
            }],
            saisie_chat: String::new(),
            pont: None,
            en_attente: Vec::new(),
        }
    }
}

impl AppCalc {
    /* ------------------------ Pavé numérique (état seulement) ------------------------ */

    pub fn presse_chiffre(&mut self, chiffre: char) {
        if self.affichage == AFFICHAGE_DEFAUT {
            self.affichage = chiffre.to_string();
        } else {
            self.affichage.push(chiffre);
        }
    }

    /// Un seul point par nombre.
    pub fn presse_point(&mut self) {
        if !self.affichage.contains('.') {
            self.affichage.push('.');
        }
    }

    /// L'équation accumule « affichage opérateur », l'écran repart à zéro.
    pub fn presse_operateur(&mut self, operateur: char) {
        self.equation.push_str(&self.affichage);
        self.equation.push(' ');
        self.equation.push(operateur);
        self.equation.push(' ');
        self.affichage = AFFICHAGE_DEFAUT.to_string();
    }

    pub fn retour_arriere(&mut self) {
        self.affichage.pop();
        if self.affichage.is_empty() {
            self.affichage = AFFICHAGE_DEFAUT.to_string();
        }
    }

    /// C : tout effacer (écran + équation).
    pub fn efface(&mut self) {
        self.affichage = AFFICHAGE_DEFAUT.to_string();
        self.equation.clear();
    }

    /// Assemble la chaîne à évaluer pour « = ».
    ///
    /// Si « = » arrive juste après un opérateur (écran encore à zéro),
    /// l'opérateur pendant est retiré : « 6 * 6 * » devient « 6 * 6 ».
    /// None quand il n'y a rien à évaluer (écran seul, sans équation).
    pub fn equation_finale(&self) -> Option<String> {
        let finale = if self.affichage == AFFICHAGE_DEFAUT && !self.equation.is_empty() {
            let tronquee = self.equation.trim_end();
            let tronquee = tronquee.strip_suffix(['+', '-', '*', '/']).unwrap_or(tronquee);
            tronquee.trim_end().to_string()
        } else {
            format!("{}{}", self.equation, self.affichage)
        };

        if finale.is_empty() || finale == self.affichage {
            return None;
        }
        Some(finale)
    }

    /// Dépose un résultat d'évaluation (appelé par la vue).
    pub fn affiche_resultat(&mut self, valeur: f64) {
        self.affichage = format!("{valeur}");
        self.equation.clear();
    }

    /// L'UI replie toutes les erreurs du noyau en un indicateur unique ;
    /// la variante exacte reste au niveau du noyau.
    pub fn affiche_erreur(&mut self) {
        self.affichage = "Erreur".to_string();
        self.equation.clear();
    }

    /* ------------------------ Panneau guichet ------------------------ */

    /// Ouvre/ferme le panneau ; la première ouverture démarre le serveur
    /// et demande la cotation de la devise courante.
    pub fn bascule_guichet(&mut self) {
        self.mode_guichet = !self.mode_guichet;
        if self.mode_guichet {
            self.demarre_pont();
            if self.pont.is_some() {
                self.demande_taux();
            }
        }
    }

    pub fn choisit_devise(&mut self, code: &str) {
        if self.devise != code {
            self.devise = code.to_string();
            self.taux_courant = None;
            if self.mode_guichet && self.pont.is_some() {
                self.demande_taux();
            }
        }
    }

    pub fn demande_taux(&mut self) {
        let requete = Requete::ExchangeRate {
            currency: self.devise.clone(),
            rate_type: TypeTaux::CashSell,
        };
        self.envoie(Attendu::Taux, &requete);
    }

    pub fn demande_calcul(&mut self) {
        let Ok(montant) = self.montant_twd.trim().parse::<f64>() else {
            self.message_systeme("⚠️ montant TWD invalide");
            return;
        };
        let requete = Requete::CalculateExchange {
            currency: self.devise.clone(),
            twd_amount: montant,
            is_buying: true,
        };
        self.envoie(Attendu::Calcul, &requete);
    }

    /// Pousse la saisie dans le fil et l'expédie au guichetier, avec une
    /// bulle provisoire en attendant la réponse.
    pub fn envoie_chat(&mut self) {
        let question = self.saisie_chat.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.saisie_chat.clear();

        self.messages.push(MessageChat {
            genre: GenreMessage::Usager,
            contenu: question.clone(),
        });
        self.messages.push(MessageChat {
            genre: GenreMessage::Reflexion,
            contenu: "Analyse de votre question…".into(),
        });

        if !self.envoie(Attendu::Chat, &Requete::AiChat { query: question }) {
            self.retire_reflexion();
        }
    }

    pub fn attend_des_reponses(&self) -> bool {
        !self.en_attente.is_empty()
    }

    /* ------------------------ Plomberie pont ------------------------ */

    /// Commande du serveur guichet, dans l'ordre :
    /// 1. `CALCULATRICE_SERVEUR` (env) ;
    /// 2. `guichet-serveur` à côté de l'exécutable ;
    /// 3. `guichet-serveur` dans le PATH.
    fn commande_serveur() -> Command {
        if let Ok(chemin) = std::env::var("CALCULATRICE_SERVEUR") {
            if !chemin.is_empty() {
                return Command::new(chemin);
            }
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(dossier) = exe.parent() {
                let local = dossier.join(format!("guichet-serveur{}", std::env::consts::EXE_SUFFIX));
                if local.exists() {
                    return Command::new(local);
                }
            }
        }

        Command::new("guichet-serveur")
    }

    fn demarre_pont(&mut self) {
        if self.pont.is_some() {
            return;
        }
        match Pont::lancer(Self::commande_serveur()) {
            Ok(pont) => {
                self.pont = Some(pont);
                self.message_systeme("Guichet de change ouvert. Posez vos questions sur les taux.");
            }
            Err(e) => self.message_systeme(format!("⚠️ serveur guichet indisponible : {e}")),
        }
    }

    /// Vrai si la requête est bien partie (et donc attendue).
    fn envoie(&mut self, attendu: Attendu, requete: &Requete) -> bool {
        let Some(pont) = &self.pont else {
            self.message_systeme("⚠️ guichet hors service");
            return false;
        };
        let livraison = pont.envoyer(requete);
        self.en_attente.push(Attente { attendu, livraison });
        true
    }

    /// Relève les réponses arrivées, sans jamais bloquer.
    /// À appeler une fois par frame, avant le rendu.
    pub fn releve_reponses(&mut self) {
        let mut arrivees: Vec<(Attendu, Result<Value, ErreurPont>)> = Vec::new();

        self.en_attente.retain(|attente| match attente.livraison.try_recv() {
            Ok(resultat) => {
                arrivees.push((attente.attendu, resultat));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                arrivees.push((attente.attendu, Err(ErreurPont::Arrete)));
                false
            }
        });

        for (attendu, resultat) in arrivees {
            self.traite_arrivee(attendu, resultat);
        }
    }

    fn traite_arrivee(&mut self, attendu: Attendu, resultat: Result<Value, ErreurPont>) {
        if matches!(attendu, Attendu::Chat) {
            self.retire_reflexion();
        }

        let valeur = match resultat {
            Ok(valeur) => valeur,
            Err(e) => {
                self.message_systeme(format!("⚠️ guichet : {e}"));
                return;
            }
        };

        match attendu {
            Attendu::Taux => match serde_json::from_value::<InfoTaux>(valeur) {
                Ok(info) if info.success => {
                    self.message_systeme(format!("Cotation {} reçue ({}).", info.currency, info.date));
                    self.taux_courant = Some(info);
                }
                Ok(info) => self.message_systeme(format!(
                    "⚠️ cotation {} indisponible : {}",
                    self.devise,
                    info.error.unwrap_or_default()
                )),
                Err(e) => self.message_systeme(format!("⚠️ réponse cotation illisible : {e}")),
            },

            Attendu::Calcul => match serde_json::from_value::<ReponseCalcul>(valeur) {
                Ok(r) if r.success => {
                    let mut contenu = format!(
                        "Conversion\nMontant TWD : NT$ {:.0}\nMontant obtenu : {:.2} {}\nTaux appliqué : {}\nDate : {}",
                        r.twd_amount, r.foreign_amount, r.currency, r.rate, r.date
                    );
                    if let Some(avertissement) = &r.warning {
                        contenu.push_str(&format!("\n⚠️ {avertissement}"));
                    }
                    self.messages.push(MessageChat {
                        genre: GenreMessage::Guichetier,
                        contenu,
                    });
                }
                Ok(r) => self.message_systeme(format!(
                    "⚠️ conversion impossible : {}",
                    r.error.unwrap_or_default()
                )),
                Err(e) => self.message_systeme(format!("⚠️ réponse conversion illisible : {e}")),
            },

            Attendu::Chat => match serde_json::from_value::<ReponseChat>(valeur) {
                Ok(r) => {
                    let contenu = if r.message.is_empty() {
                        r.error
                            .unwrap_or_else(|| "Désolé, je n'ai pas pu traiter votre question.".into())
                    } else {
                        r.message
                    };
                    self.messages.push(MessageChat {
                        genre: GenreMessage::Guichetier,
                        contenu,
                    });
                }
                Err(e) => self.message_systeme(format!("⚠️ réponse du guichetier illisible : {e}")),
            },
        }
    }

    fn retire_reflexion(&mut self) {
        self.messages.retain(|m| m.genre != GenreMessage::Reflexion);
    }

    fn message_systeme(&mut self, contenu: impl Into<String>) {
        self.messages.push(MessageChat {
            genre: GenreMessage::Systeme,
            contenu: contenu.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCalc, GenreMessage, AFFICHAGE_DEFAUT};

    fn tape(app: &mut AppCalc, touches: &str) {
        for c in touches.chars() {
            match c {
                '0'..='9' => app.presse_chiffre(c),
                '.' => app.presse_point(),
                '+' | '-' | '*' | '/' => app.presse_operateur(c),
                _ => panic!("touche inconnue dans le test : {c:?}"),
            }
        }
    }

    #[test]
    fn saisie_des_chiffres() {
        let mut app = AppCalc::default();
        assert_eq!(app.affichage, AFFICHAGE_DEFAUT);

        tape(&mut app, "50");
        assert_eq!(app.affichage, "50");

        // le zéro de repos est remplacé, pas préfixé
        app.efface();
        tape(&mut app, "07");
        assert_eq!(app.affichage, "7");
    }

    #[test]
    fn point_unique() {
        let mut app = AppCalc::default();
        tape(&mut app, "3.5");
        app.presse_point();
        assert_eq!(app.affichage, "3.5");
    }

    #[test]
    fn equation_accumulee() {
        let mut app = AppCalc::default();
        tape(&mut app, "5+3*2");

        assert_eq!(app.equation, "5 + 3 * ");
        assert_eq!(app.affichage, "2");
        assert_eq!(app.equation_finale().as_deref(), Some("5 + 3 * 2"));
    }

    #[test]
    fn egal_apres_operateur_retire_l_operateur() {
        let mut app = AppCalc::default();
        tape(&mut app, "6*6*");

        // « = » juste après « * » : l'opérateur pendant saute
        assert_eq!(app.affichage, AFFICHAGE_DEFAUT);
        assert_eq!(app.equation_finale().as_deref(), Some("6 * 6"));
    }

    #[test]
    fn egal_sans_equation_ne_fait_rien() {
        let mut app = AppCalc::default();
        assert_eq!(app.equation_finale(), None);

        tape(&mut app, "42");
        assert_eq!(app.equation_finale(), None);
    }

    #[test]
    fn retour_arriere_plancher_zero() {
        let mut app = AppCalc::default();
        tape(&mut app, "12");

        app.retour_arriere();
        assert_eq!(app.affichage, "1");
        app.retour_arriere();
        assert_eq!(app.affichage, AFFICHAGE_DEFAUT);
        app.retour_arriere();
        assert_eq!(app.affichage, AFFICHAGE_DEFAUT);
    }

    #[test]
    fn efface_tout() {
        let mut app = AppCalc::default();
        tape(&mut app, "5+3");
        app.efface();

        assert_eq!(app.affichage, AFFICHAGE_DEFAUT);
        assert_eq!(app.equation, "");
        assert_eq!(app.equation_finale(), None);
    }

    #[test]
    fn resultat_reutilisable() {
        let mut app = AppCalc::default();
        tape(&mut app, "5+3");

        app.affiche_resultat(8.0);
        assert_eq!(app.affichage, "8");
        assert_eq!(app.equation, "");

        // on enchaîne un calcul sur le résultat
        tape(&mut app, "*2");
        assert_eq!(app.equation_finale().as_deref(), Some("8 * 2"));
    }

    #[test]
    fn saisie_chat_videe_et_bulles_posees() {
        let mut app = AppCalc::default();
        app.saisie_chat = "  taux du yen ?  ".into();

        // pas de pont démarré : l'envoi échoue proprement en message système
        app.envoie_chat();

        assert_eq!(app.saisie_chat, "");
        let genres: Vec<_> = app.messages.iter().map(|m| m.genre).collect();
        assert!(genres.contains(&GenreMessage::Usager));
        assert!(genres.contains(&GenreMessage::Systeme));
        // pas de bulle provisoire orpheline quand rien n'est parti
        assert!(!genres.contains(&GenreMessage::Reflexion));
        assert!(!app.attend_des_reponses());
    }
}
