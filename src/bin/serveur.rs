// src/bin/serveur.rs
//
// Serveur guichet — le processus enfant du pont.
// Une requête JSON par ligne sur stdin, une réponse JSON par ligne sur
// stdout, dans l'ordre. stdout est le canal protocole : tout le journal
// part sur stderr.

use std::io::{self, BufRead, Write};

use serde_json::Value;

use calculatrice_guichet::guichet::Guichetier;
use calculatrice_guichet::pont::protocole::{enveloppe_erreur, Requete};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("serveur guichet démarré");

    let guichetier = Guichetier::nouveau();

    let entree = io::stdin();
    let mut sortie = io::stdout().lock();

    for ligne in entree.lock().lines() {
        let Ok(ligne) = ligne else { break };
        let ligne = ligne.trim();
        if ligne.is_empty() {
            continue;
        }

        let reponse = match serde_json::from_str::<Requete>(ligne) {
            Ok(requete) => guichetier.traite(&requete),
            Err(e) => {
                log::warn!("requête refusée : {e}");
                enveloppe_erreur(format!("JSON invalide : {e}"))
            }
        };

        if ecrit_ligne(&mut sortie, &reponse).is_err() {
            break;
        }
    }

    log::info!("fin d'entrée, arrêt du serveur");
}

fn ecrit_ligne(sortie: &mut impl Write, reponse: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *sortie, reponse)?;
    sortie.write_all(b"\n")?;
    sortie.flush()
}
