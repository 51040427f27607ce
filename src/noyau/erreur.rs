// src/noyau/erreur.rs

use thiserror::Error;

/// Échecs du noyau d'évaluation.
///
/// Tous déterministes (pur produit de l'entrée, jamais transitoires) :
/// l'évaluateur remonte la première erreur rencontrée, sans récupération
/// interne. La couche UI peut les replier en un seul indicateur générique,
/// mais la variante exacte reste observable ici pour les tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurEval {
    /// Rien à évaluer une fois les espaces retirés.
    #[error("entrée vide")]
    EntreeVide,

    /// Caractère hors de l'ensemble `[0-9 + - * / ( ) .]`.
    ///
    /// C'est la barrière qui rend l'évaluateur sûr à la place d'un
    /// `eval()` : lettres, crochets, point-virgules, tout est rejeté
    /// AVANT la moindre analyse structurelle.
    #[error("caractère interdit : '{0}'")]
    CaractereInvalide(char),

    /// Un dénominateur vaut exactement zéro.
    /// Jamais d'infini ni de NaN silencieux.
    #[error("division par zéro")]
    DivisionParZero,

    /// Une feuille ne se lit pas comme un nombre : segment vide laissé par
    /// un opérateur pendant, décimale mal formée (`1.2.3`), parenthèses
    /// dépareillées…
    #[error("nombre invalide : « {0} »")]
    NombreInvalide(String),
}
