//! Built-in opening corpus.
//!
//! The corpus is ordered: when several lines match the moves played so far,
//! the earliest entry is the one reported.

use crate::database::OpeningDatabase;
use crate::opening::Opening;

/// (ECO, name, SAN line, description)
type Entry = (&'static str, &'static str, &'static [&'static str], &'static str);

const BUILTIN: &[Entry] = &[
    (
        "A00",
        "King's Pawn Opening",
        &["e4"],
        "The most popular first move: it takes the centre and opens lines for the queen and bishop.",
    ),
    (
        "A40",
        "Queen's Pawn Opening",
        &["d4"],
        "Claims the centre and frees the queen and bishop, usually leading to positional play.",
    ),
    (
        "A01",
        "Nf3 Opening (Reti)",
        &["Nf3"],
        "A flexible start that transposes into many systems without committing the pawns.",
    ),
    (
        "A20",
        "English Opening (One Move)",
        &["c4"],
        "Fights for the centre from the flank and prepares harmonious development.",
    ),
    (
        "B00",
        "e3 Opening (Van't Kruijs)",
        &["e3"],
        "A quiet start that often becomes a Colle or a reversed French structure.",
    ),
    (
        "B20",
        "Sicilian Defense (One Move)",
        &["e4", "c5"],
        "The most popular reply to 1.e4, creating an unbalanced fight with counterattacking chances.",
    ),
    (
        "C00",
        "French Defense (One Move)",
        &["e4", "e6"],
        "Prepares ...d5 to challenge the centre, often leading to closed pawn chains.",
    ),
    (
        "B10",
        "Caro-Kann Defense (One Move)",
        &["e4", "c6"],
        "A solid defence aiming for a healthy pawn structure and long-term safety.",
    ),
    (
        "B07",
        "Pirc Defense (One Move)",
        &["e4", "d6"],
        "A hypermodern setup that lets White build a centre before striking at it.",
    ),
    (
        "B01",
        "Scandinavian Defense (One Move)",
        &["e4", "d5"],
        "Challenges the e4 pawn at once, leading to open and tactical play.",
    ),
    (
        "C60",
        "Ruy Lopez",
        &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"],
        "White develops with pressure on the e5 defender; after ...a6 Ba4 the pin is maintained.",
    ),
    (
        "C20",
        "Bongcloud Attack",
        &["e4", "e5", "Ke2", "Nf6", "Ke3"],
        "A provocative line in which White walks the king forward in the opening.",
    ),
    (
        "B90",
        "Najdorf Variation",
        &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6", "Be2", "e5"],
        "A flagship Sicilian: ...a6 stops Nb5 and prepares ...e5 or ...b5 with rich play.",
    ),
    (
        "C65",
        "Berlin Defense",
        &["e4", "e5", "Nf3", "Nc6", "Bb5", "Nf6", "O-O", "Nxe4", "Re1", "Nd6"],
        "A very solid defence that often simplifies into balanced endgames.",
    ),
    (
        "E60",
        "King's Indian Defense",
        &["d4", "Nf6", "c4", "g6", "Nc3", "Bg7", "e4", "d6"],
        "Concedes the centre for now, then hits back with ...e5 or ...c5 and a kingside attack.",
    ),
    (
        "D30",
        "Queen's Gambit",
        &["d4", "d5", "c4", "e6", "Nc3", "Nf6"],
        "White offers a wing pawn to deflect Black's d-pawn and gain central space.",
    ),
    (
        "C53",
        "Italian Game",
        &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6"],
        "Classical development; White prepares d4 or a slow kingside build-up.",
    ),
    (
        "B50",
        "Sicilian Defense",
        &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6"],
        "Imbalanced play where Black counters on the c-file and the dark squares.",
    ),
    (
        "D02",
        "London System",
        &["d4", "d5", "Nf3", "Nf6", "Bf4", "e6", "e3", "Nbd7"],
        "System-based development with Bf4 that holds up against most setups.",
    ),
    (
        "A02",
        "Fool's Mate",
        &["f3", "e5", "g4", "Qh4#"],
        "The fastest possible mate, after White fatally weakens the kingside.",
    ),
    (
        "A25",
        "English Opening",
        &["c4", "e5", "Nc3", "Nf6", "g3", "d5"],
        "Central control from the flank with flexible structures and frequent transpositions.",
    ),
    (
        "A85",
        "Dutch Defense",
        &["d4", "f5", "c4", "Nf6", "g3", "g6", "Bg2"],
        "Black fights for e4 and dynamic kingside play with ...f5.",
    ),
    (
        "C30",
        "King's Gambit",
        &["e4", "e5", "f4", "exf4", "Nf3", "g5"],
        "A romantic pawn sacrifice for quick development and an open f-file.",
    ),
    (
        "D70",
        "Grünfeld Defense",
        &["d4", "Nf6", "c4", "g6", "Nc3", "d5", "cxd5", "Nxd5"],
        "Black lets White build a broad centre and then undermines it with piece pressure.",
    ),
    (
        "C40",
        "Intercontinental Ballistic Missile Gambit",
        &[
            "e4", "d5", "Nf3", "dxe4", "Ng5", "Nf6", "d3", "exd3", "Bxd3", "h6", "Nxf7", "Kxf7",
            "Bg6+", "Kxg6", "Qxd8",
        ],
        "An unsound but spectacular gambit full of early sacrifices and forcing play.",
    ),
];

/// Returns the built-in openings in corpus order.
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    BUILTIN
        .iter()
        .map(|(eco, name, moves, description)| {
            Opening::new(*eco, *name, moves.iter().map(|m| m.to_string()).collect())
                .with_description(*description)
        })
        .collect()
}

/// Creates the built-in opening database.
#[must_use]
pub fn builtin_database() -> OpeningDatabase {
    OpeningDatabase::with_openings(builtin_openings())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_not_empty() {
        let openings = builtin_openings();
        assert_eq!(openings.len(), BUILTIN.len());
        assert!(openings.iter().all(|o| !o.moves.is_empty()));
    }

    #[test]
    fn test_builtin_order_starts_with_kings_pawn() {
        let openings = builtin_openings();
        assert_eq!(openings[0].name, "King's Pawn Opening");
        assert_eq!(openings[0].moves, vec!["e4".to_string()]);
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let openings = builtin_openings();
        let mut names: Vec<_> = openings.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), openings.len());
    }

    #[test]
    fn test_builtin_database_matches_openings() {
        let db = builtin_database();
        assert_eq!(db.len(), builtin_openings().len());
    }
}
