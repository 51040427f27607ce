// src/app/vue.rs
//
// Vue (UI egui) — calculatrice + panneau guichet
// ----------------------------------------------
// Objectifs :
// - Pavé à gros boutons, écran à droite, équation en petit au-dessus
// - Le « = » évalue via le noyau ; toute erreur devient « Erreur »
// - Panneau guichet : devise, cotation, conversion, fil de discussion
// - Jamais d'attente ici : les réponses du serveur sont relevées par
//   app.rs (releve_reponses) avant le rendu

use eframe::egui;

use super::etat::{AppCalc, GenreMessage, MessageChat};
use crate::noyau;

/// Devises proposées dans le panneau (sous-ensemble courant du guichet).
const DEVISES_PANNEAU: &[(&str, &str)] = &[
    ("USD", "dollar américain"),
    ("EUR", "euro"),
    ("JPY", "yen"),
    ("CNY", "yuan"),
    ("GBP", "livre sterling"),
    ("AUD", "dollar australien"),
    ("HKD", "dollar de Hong Kong"),
    ("SGD", "dollar de Singapour"),
];

#[derive(Clone, Copy, Debug)]
enum Action {
    Efface,
    RetourArriere,
    Point,
    Egal,
}

impl AppCalc {
    /* ------------------------ Calculatrice ------------------------ */

    pub fn ui_calculatrice(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Calculatrice Guichet");
        ui.add_space(6.0);

        // équation en cours, en petit au-dessus de l'écran
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(&self.equation).weak().monospace());
        });

        // écran
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.affichage).monospace().size(34.0));
                });
            });

        ui.add_space(8.0);

        let libelle = if self.mode_guichet {
            "Fermer le guichet de change"
        } else {
            "Ouvrir le guichet de change"
        };
        if ui
            .add_sized([ui.available_width(), 34.0], egui::Button::new(libelle))
            .clicked()
        {
            self.bascule_guichet();
        }

        ui.add_space(8.0);

        self.ui_pave(ui);
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_action(ui, "C", "Efface tout", Action::Efface);
                ui.label("");
                self.bouton_action(ui, "⌫", "Efface le dernier chiffre", Action::RetourArriere);
                self.bouton_operateur(ui, "÷", '/');
                ui.end_row();

                self.bouton_chiffre(ui, '7');
                self.bouton_chiffre(ui, '8');
                self.bouton_chiffre(ui, '9');
                self.bouton_operateur(ui, "×", '*');
                ui.end_row();

                self.bouton_chiffre(ui, '4');
                self.bouton_chiffre(ui, '5');
                self.bouton_chiffre(ui, '6');
                self.bouton_operateur(ui, "−", '-');
                ui.end_row();

                self.bouton_chiffre(ui, '1');
                self.bouton_chiffre(ui, '2');
                self.bouton_chiffre(ui, '3');
                self.bouton_operateur(ui, "+", '+');
                ui.end_row();

                self.bouton_chiffre(ui, '0');
                ui.label("");
                self.bouton_action(ui, ".", "Point décimal", Action::Point);
                self.bouton_action(ui, "=", "Évalue l'équation", Action::Egal);
                ui.end_row();
            });
    }

    fn bouton_chiffre(&mut self, ui: &mut egui::Ui, chiffre: char) {
        if ui
            .add_sized([56.0, 40.0], egui::Button::new(chiffre.to_string()))
            .clicked()
        {
            self.presse_chiffre(chiffre);
        }
    }

    fn bouton_operateur(&mut self, ui: &mut egui::Ui, libelle: &str, operateur: char) {
        if ui.add_sized([56.0, 40.0], egui::Button::new(libelle)).clicked() {
            self.presse_operateur(operateur);
        }
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, libelle: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 40.0], egui::Button::new(libelle))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::Efface => self.efface(),
                Action::RetourArriere => self.retour_arriere(),
                Action::Point => self.presse_point(),
                Action::Egal => self.egal(),
            }
        }
    }

    /// Évalue l'équation accumulée via le noyau et dépose le résultat.
    ///
    /// L'UI replie tout échec en « Erreur » ; la variante exacte part au
    /// journal, elle reste assertable au niveau du noyau.
    pub(crate) fn egal(&mut self) {
        let Some(finale) = self.equation_finale() else { return };

        match noyau::evaluer(&finale) {
            Ok(valeur) => self.affiche_resultat(valeur),
            Err(e) => {
                log::debug!("évaluation refusée ({finale:?}) : {e}");
                self.affiche_erreur();
            }
        }
    }

    /* ------------------------ Panneau guichet ------------------------ */

    pub fn ui_guichet(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Guichet de change");
        ui.label("Cotations Banque de Taïwan (FinMind)");
        ui.add_space(4.0);

        egui::CollapsingHeader::new("Outils rapides")
            .default_open(true)
            .show(ui, |ui| {
                self.ui_outils_rapides(ui);
            });

        ui.separator();
        self.ui_fil_discussion(ui);
    }

    fn ui_outils_rapides(&mut self, ui: &mut egui::Ui) {
        egui::ComboBox::from_label("Devise")
            .selected_text(self.texte_devise())
            .show_ui(ui, |ui| {
                for (code, nom) in DEVISES_PANNEAU {
                    if ui
                        .selectable_label(self.devise == *code, format!("{nom} ({code})"))
                        .clicked()
                    {
                        self.choisit_devise(code);
                    }
                }
            });

        if let Some(info) = &self.taux_courant {
            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .show(ui, |ui| {
                    ui.label(format!("Cotation du {}", info.date));
                    ui.monospace(format!("achat billets : {:>9.3}", info.cash_buy));
                    ui.monospace(format!("vente billets : {:>9.3}", info.cash_sell));
                });
        } else {
            ui.weak("cotation en attente…");
        }

        ui.horizontal(|ui| {
            ui.label("Montant (NT$) :");
            ui.add(egui::TextEdit::singleline(&mut self.montant_twd).desired_width(90.0));
            if ui.button("Convertir").clicked() {
                self.demande_calcul();
            }
        });
    }

    fn ui_fil_discussion(&mut self, ui: &mut egui::Ui) {
        let hauteur_saisie = 40.0;
        let hauteur_fil = (ui.available_height() - hauteur_saisie).max(120.0);

        egui::ScrollArea::vertical()
            .max_height(hauteur_fil)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &self.messages {
                    Self::bulle_message(ui, message);
                }
            });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.saisie_chat)
                    .desired_width(ui.available_width() - 76.0)
                    .hint_text("Ex : « taux du yen ? », « 10000 TWD en euros »"),
            );

            let entree = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (resp.lost_focus() && entree) || ui.button("Envoyer").clicked() {
                self.envoie_chat();
                resp.request_focus();
            }
        });
    }

    fn bulle_message(ui: &mut egui::Ui, message: &MessageChat) {
        let (etiquette, couleur) = match message.genre {
            GenreMessage::Usager => ("vous", ui.visuals().hyperlink_color),
            GenreMessage::Guichetier => ("guichetier", ui.visuals().strong_text_color()),
            GenreMessage::Systeme => ("système", ui.visuals().weak_text_color()),
            GenreMessage::Reflexion => ("guichetier", ui.visuals().weak_text_color()),
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new(etiquette).small().color(couleur));
            ui.label(&message.contenu);
        });
        ui.add_space(2.0);
    }

    fn texte_devise(&self) -> String {
        DEVISES_PANNEAU
            .iter()
            .find(|(code, _)| *code == self.devise)
            .map(|(code, nom)| format!("{nom} ({code})"))
            .unwrap_or_else(|| self.devise.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::AppCalc;

    fn tape(app: &mut AppCalc, touches: &str) {
        for c in touches.chars() {
            match c {
                '0'..='9' => app.presse_chiffre(c),
                '.' => app.presse_point(),
                '+' | '-' | '*' | '/' => app.presse_operateur(c),
                '=' => app.egal(),
                _ => panic!("touche inconnue dans le test : {c:?}"),
            }
        }
    }

    #[test]
    fn egal_evalue_avec_precedence() {
        let mut app = AppCalc::default();
        tape(&mut app, "5+3*2=");
        assert_eq!(app.affichage, "11");
        assert_eq!(app.equation, "");
    }

    #[test]
    fn egal_apres_operateur() {
        let mut app = AppCalc::default();
        tape(&mut app, "6*6*=");
        assert_eq!(app.affichage, "36");
    }

    #[test]
    fn egal_sur_nombre_seul_ne_change_rien() {
        let mut app = AppCalc::default();
        tape(&mut app, "42=");
        assert_eq!(app.affichage, "42");
    }

    #[test]
    fn division_par_zero_affiche_erreur() {
        // « 0 » nu est pris pour un écran vierge (l'opérateur pendant
        // saute), il faut « 0. » pour vraiment diviser par zéro
        let mut app = AppCalc::default();
        tape(&mut app, "5/0.=");
        assert_eq!(app.affichage, "Erreur");
        assert_eq!(app.equation, "");
    }

    #[test]
    fn zero_nu_apres_operateur_laisse_tomber_l_operateur() {
        // fidèle au pavé d'origine : « 5 / 0 = » se lit « 5 = »
        let mut app = AppCalc::default();
        tape(&mut app, "5/0=");
        assert_eq!(app.affichage, "5");
    }

    #[test]
    fn resultat_flottant_affiche() {
        let mut app = AppCalc::default();
        tape(&mut app, "7/2=");
        assert_eq!(app.affichage, "3.5");
    }

    #[test]
    fn enchainement_sur_le_resultat() {
        let mut app = AppCalc::default();
        tape(&mut app, "2+2=*3=");
        assert_eq!(app.affichage, "12");
    }
}
