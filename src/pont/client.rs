// src/pont/client.rs
//
// Client du serveur guichet : un processus enfant, une requête JSON par
// ligne sur son stdin, une réponse JSON par ligne sur son stdout.
//
// Discipline d'appariement (c'est le contrat, pas un détail) :
// - FIFO pur : la réponse la plus ancienne sert la requête la plus
//   ancienne, aucun identifiant de corrélation.
// - Chaque requête porte une échéance fixe ; passée l'échéance elle
//   échoue seule, indépendamment du transport.
// - Une ligne qui ne commence pas par `{` est du journal hors-bande :
//   elle ne consomme rien. Une ligne qui commence par `{` mais ne se
//   parse pas consomme (et fait échouer) la requête la plus ancienne.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;

use super::protocole::Requete;

/// Échéance par défaut d'une requête (comme l'ancien pont Electron).
pub const DELAI_REPONSE: Duration = Duration::from_secs(30);

/// Pas de balayage des échéances.
const TIC_GARDE: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurPont {
    #[error("délai de réponse dépassé")]
    DelaiDepasse,

    #[error("réponse illisible du serveur : {0}")]
    ReponseIllisible(String),

    #[error("serveur guichet arrêté")]
    Arrete,

    #[error("écriture vers le serveur : {0}")]
    Ecriture(String),
}

/// Côté réception d'une requête envoyée : exactement un résultat finira
/// par arriver (réponse, échec de transport ou échéance).
pub type Livraison = Receiver<Result<Value, ErreurPont>>;

struct EnAttente {
    expediteur: SyncSender<Result<Value, ErreurPont>>,
    echeance: Instant,
}

type File = Arc<Mutex<VecDeque<EnAttente>>>;

pub struct Pont {
    enfant: Child,
    entree: Mutex<ChildStdin>,
    file: File,
    delai: Duration,
}

impl Pont {
    /// Démarre le serveur et les deux fils (lecteur + garde des échéances).
    pub fn lancer(commande: Command) -> std::io::Result<Pont> {
        Self::lancer_avec_delai(commande, DELAI_REPONSE)
    }

    pub fn lancer_avec_delai(mut commande: Command, delai: Duration) -> std::io::Result<Pont> {
        let mut enfant = commande
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // stderr hérité : le journal du serveur reste visible
            .spawn()?;

        let entree = enfant
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("stdin du serveur non capturé"))?;
        let sortie = enfant
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout du serveur non capturé"))?;

        let file: File = Arc::default();

        // Fil lecteur : dépouille stdout ligne à ligne.
        {
            let file = Arc::clone(&file);
            thread::spawn(move || {
                let lecteur = BufReader::new(sortie);
                for ligne in lecteur.lines() {
                    let Ok(ligne) = ligne else { break };
                    traiter_ligne(ligne.trim(), &file);
                }

                // EOF : plus personne ne répondra
                let mut file = file.lock().expect("file pont");
                while let Some(p) = file.pop_front() {
                    let _ = p.expediteur.send(Err(ErreurPont::Arrete));
                }
            });
        }

        // Fil garde : fait tomber les échéances. Il ne retient pas la
        // file (Weak) et s'éteint avec le pont.
        {
            let file = Arc::downgrade(&file);
            thread::spawn(move || garde_echeances(file));
        }

        Ok(Pont {
            enfant,
            entree: Mutex::new(entree),
            file,
            delai,
        })
    }

    /// Sérialise la requête sur une ligne et l'enfile.
    ///
    /// L'écriture se fait sous le verrou de la file : l'ordre sur le fil
    /// est toujours l'ordre de la file, même avec plusieurs appelants.
    pub fn envoyer(&self, requete: &Requete) -> Livraison {
        let (expediteur, livraison) = mpsc::sync_channel(1);

        let ligne = match serde_json::to_string(requete) {
            Ok(ligne) => ligne,
            Err(e) => {
                let _ = expediteur.send(Err(ErreurPont::Ecriture(e.to_string())));
                return livraison;
            }
        };

        let mut file = self.file.lock().expect("file pont");
        let mut entree = self.entree.lock().expect("stdin pont");

        if let Err(e) = writeln!(entree, "{ligne}").and_then(|_| entree.flush()) {
            let _ = expediteur.send(Err(ErreurPont::Ecriture(e.to_string())));
            return livraison;
        }

        file.push_back(EnAttente {
            expediteur,
            echeance: Instant::now() + self.delai,
        });

        livraison
    }
}

impl Drop for Pont {
    fn drop(&mut self) {
        // rejette tout ce qui attend encore, puis stoppe l'enfant
        {
            let mut file = self.file.lock().expect("file pont");
            while let Some(p) = file.pop_front() {
                let _ = p.expediteur.send(Err(ErreurPont::Arrete));
            }
        }
        let _ = self.enfant.kill();
        let _ = self.enfant.wait();
    }
}

/// Classe une ligne du stdout serveur et sert la file.
fn traiter_ligne(ligne: &str, file: &Mutex<VecDeque<EnAttente>>) {
    if ligne.is_empty() {
        return;
    }

    // Hors-bande : pas un objet JSON, donc du journal. Ne consomme rien.
    if !ligne.starts_with('{') {
        log::info!("serveur (hors-bande) : {ligne}");
        return;
    }

    let resultat = match serde_json::from_str::<Value>(ligne) {
        Ok(valeur) => Ok(valeur),
        // commence par `{` mais illisible : la requête la plus ancienne
        // est consommée et échoue
        Err(e) => Err(ErreurPont::ReponseIllisible(e.to_string())),
    };

    let Some(p) = file.lock().expect("file pont").pop_front() else {
        log::warn!("réponse orpheline ignorée : {ligne}");
        return;
    };
    let _ = p.expediteur.send(resultat);
}

/// Toutes les requêtes partagent le même délai : la plus ancienne expire
/// toujours la première, il suffit donc de regarder la tête de file.
fn garde_echeances(file: Weak<Mutex<VecDeque<EnAttente>>>) {
    loop {
        thread::sleep(TIC_GARDE);

        let Some(file) = file.upgrade() else { break };
        let mut file = file.lock().expect("file pont");

        let maintenant = Instant::now();
        while file.front().is_some_and(|p| p.echeance <= maintenant) {
            let p = file.pop_front().expect("tête vérifiée");
            let _ = p.expediteur.send(Err(ErreurPont::DelaiDepasse));
        }
    }
}
