//! Noyau — évaluation (descente récursive)
//!
//! tokenize -> expression -> terme -> facteur
//!
//! Chaque niveau découpe sa tranche de jetons sur les opérateurs de son
//! rang situés à profondeur 0 (parenthèses comptées), puis replie de
//! gauche à droite. Pas de curseur global : un niveau reçoit une tranche,
//! rend une valeur. La récursion est bornée par l'imbrication de
//! parenthèses de l'entrée.

use super::erreur::ErreurEval;
use super::jetons::{format_jetons, tokenize, Jeton};

/// API publique : évalue une expression arithmétique du pavé
/// (`+ - * /`, parenthèses, moins unaire) en `f64`.
///
/// Fonction pure, synchrone, sans état partagé. La validation de
/// caractères a lieu à la tokenisation, AVANT toute analyse de structure
/// (c'est elle qui remplace un `eval()` sous CSP stricte).
pub fn evaluer(expression: &str) -> Result<f64, ErreurEval> {
    let jetons = tokenize(expression)?;
    expr_additive(&jetons)
}

/* ------------------------ Découpe au niveau 0 ------------------------ */

/// Rang d'opérateurs sur lequel un niveau découpe.
#[derive(Clone, Copy, Debug)]
enum Rang {
    Additif,        // + -
    Multiplicatif,  // * /
}

impl Rang {
    fn contient(self, j: &Jeton) -> bool {
        match self {
            Rang::Additif => matches!(j, Jeton::Plus | Jeton::Moins),
            Rang::Multiplicatif => matches!(j, Jeton::Etoile | Jeton::Barre),
        }
    }
}

/// Découpe une tranche sur les opérateurs d'un rang à profondeur 0.
///
/// Retourne (segments, opérateurs) avec `segments.len() == ops.len() + 1` :
/// la suite alternée segment, op, segment, … consommée par le pli.
///
/// Un opérateur n'est un point de coupe que si le jeton précédent FERME
/// une valeur (nombre ou `)`). Sinon il reste dans son segment : c'est un
/// signe unaire, traité par `facteur` (`-5`, `--5`, `5*-3`).
fn decoupe(jetons: &[Jeton], rang: Rang) -> (Vec<&[Jeton]>, Vec<Jeton>) {
    let mut segments = Vec::new();
    let mut ops = Vec::new();

    let mut debut = 0usize;
    let mut profondeur = 0i32;
    let mut apres_valeur = false;

    for (i, j) in jetons.iter().enumerate() {
        match j {
            Jeton::ParG => {
                profondeur += 1;
                apres_valeur = false;
            }
            Jeton::ParD => {
                profondeur -= 1;
                apres_valeur = true;
            }
            Jeton::Nombre(_) => {
                apres_valeur = true;
            }
            _ => {
                if profondeur == 0 && apres_valeur && rang.contient(j) {
                    segments.push(&jetons[debut..i]);
                    ops.push(j.clone());
                    debut = i + 1;
                }
                apres_valeur = false;
            }
        }
    }

    // Dernier segment (vide si l'entrée finit sur un opérateur :
    // `facteur` échouera dessus en NombreInvalide).
    segments.push(&jetons[debut..]);

    (segments, ops)
}

/* ------------------------ Les trois niveaux ------------------------ */

/// expression := terme (('+' | '-') terme)*
/// Pli gauche->droite : `10-3-2` vaut 5, pas 9.
fn expr_additive(jetons: &[Jeton]) -> Result<f64, ErreurEval> {
    let (segments, ops) = decoupe(jetons, Rang::Additif);

    let mut resultat = terme(segments[0])?;

    for (op, seg) in ops.iter().zip(&segments[1..]) {
        let droite = terme(seg)?;
        match op {
            Jeton::Plus => resultat += droite,
            Jeton::Moins => resultat -= droite,
            _ => unreachable!("découpe additive"),
        }
    }

    Ok(resultat)
}

/// terme := facteur (('*' | '/') facteur)*
fn terme(jetons: &[Jeton]) -> Result<f64, ErreurEval> {
    let (segments, ops) = decoupe(jetons, Rang::Multiplicatif);

    let mut resultat = facteur(segments[0])?;

    for (op, seg) in ops.iter().zip(&segments[1..]) {
        let droite = facteur(seg)?;
        match op {
            Jeton::Etoile => resultat *= droite,
            Jeton::Barre => {
                if droite == 0.0 {
                    return Err(ErreurEval::DivisionParZero);
                }
                resultat /= droite;
            }
            _ => unreachable!("découpe multiplicative"),
        }
    }

    Ok(resultat)
}

/// facteur := nombre | '-' facteur | '(' expression ')'
fn facteur(jetons: &[Jeton]) -> Result<f64, ErreurEval> {
    if let [Jeton::Nombre(v)] = jetons {
        return Ok(*v);
    }

    if let Some((Jeton::Moins, reste)) = jetons.split_first() {
        return Ok(-facteur(reste)?);
    }

    if parentheses_englobantes(jetons) {
        return expr_additive(&jetons[1..jetons.len() - 1]);
    }

    // Segment vide (opérateur pendant), parenthèses dépareillées, résidu.
    Err(ErreurEval::NombreInvalide(format_jetons(jetons)))
}

/// Vrai si la tranche est entièrement enveloppée par UNE paire de
/// parenthèses : la première `(` doit être celle qui ferme sur la
/// dernière `)`. Tester seulement premier/dernier caractère serait faux
/// pour `(1)(2)` — la profondeur ne doit revenir à zéro qu'au tout
/// dernier jeton.
fn parentheses_englobantes(jetons: &[Jeton]) -> bool {
    let (Some(Jeton::ParG), Some(Jeton::ParD)) = (jetons.first(), jetons.last()) else {
        return false;
    };

    let mut profondeur = 0i32;
    for (i, j) in jetons.iter().enumerate() {
        match j {
            Jeton::ParG => profondeur += 1,
            Jeton::ParD => profondeur -= 1,
            _ => {}
        }
        if profondeur == 0 {
            return i == jetons.len() - 1;
        }
    }

    false
}
