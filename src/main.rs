// src/main.rs
//
// Calculatrice Guichet — point d'entrée natif
// -------------------------------------------
// Ici : options de fenêtre + démarrage eframe, rien d'autre.
// L'impl eframe::App vit dans src/app.rs ; le serveur guichet est un
// binaire séparé (guichet-serveur), démarré à l'ouverture du panneau.

use eframe::egui;

use calculatrice_guichet::app::AppCalc;

/// Titre unique (fenêtre + barre de titre).
const TITRE_APP: &str = "Calculatrice Guichet";

fn main() -> eframe::Result<()> {
    // RUST_LOG pilote le niveau ; par défaut on reste discret
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}
