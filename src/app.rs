// src/app.rs
//
// Calculatrice Guichet — module App (racine)
// ------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use calculatrice_guichet::app::AppCalc;)
// - Fournir l'impl eframe::App
//
// Important:
// - Les réponses du serveur sont relevées ICI, une fois par frame, avant
//   le rendu : la vue ne bloque jamais.
// - Les raccourcis clavier globaux ne jouent que si aucun champ n'a le
//   focus (sinon Enter appartient à la saisie du chat).

pub mod etat;
pub mod vue;

// Ré-export pratique : `use calculatrice_guichet::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.releve_reponses();

        let focus_libre = ctx.memory(|m| m.focused().is_none());
        if focus_libre {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.efface();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.egal();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Backspace)) {
                self.retour_arriere();
            }
        }

        if self.mode_guichet {
            egui::SidePanel::right("panneau_guichet")
                .default_width(380.0)
                .show(ctx, |ui| self.ui_guichet(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.ui_calculatrice(ui));

        // des requêtes attendent : on repeint pour relever les réponses
        if self.attend_des_reponses() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
