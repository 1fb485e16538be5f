//! Bundled quizzes and flashcard decks.
//!
//! These are the mock contents shipped with the app; there is no authoring flow.

use edu_core::model::{CardFaces, Item, ItemError, ItemId, ItemSource, Question, SourceId};

use crate::repository::{ItemSourceRepository, StorageError};

pub const MATH_QUIZ: SourceId = SourceId::new(1);
pub const MATH_DECK: SourceId = SourceId::new(10);
pub const PHYSICS_DECK: SourceId = SourceId::new(11);
pub const CHEMISTRY_DECK: SourceId = SourceId::new(12);

/// Upsert every bundled source into `repo`.
///
/// # Errors
///
/// Returns `StorageError` if a source fails validation or cannot be stored.
pub async fn seed(repo: &dyn ItemSourceRepository) -> Result<(), StorageError> {
    for source in bundled_sources()? {
        repo.upsert_source(&source).await?;
    }
    Ok(())
}

/// Build the bundled sources.
///
/// # Errors
///
/// Returns `StorageError::InvalidItem` or `StorageError::InvalidSource` if the
/// bundled data is malformed.
pub fn bundled_sources() -> Result<Vec<ItemSource>, StorageError> {
    Ok(vec![
        ItemSource::new(MATH_QUIZ, "Math Practice", "Math", math_quiz()?)?,
        deck(MATH_DECK, "Math - Core Formulas", "Math", MATH_CARDS)?,
        deck(PHYSICS_DECK, "Physics - Fundamental Laws", "Physics", PHYSICS_CARDS)?,
        deck(CHEMISTRY_DECK, "Chemistry - Basic Concepts", "Chemistry", CHEMISTRY_CARDS)?,
    ])
}

fn math_quiz() -> Result<Vec<Item>, ItemError> {
    let questions = [
        (
            "What is x if 2x + 5 = 15?",
            ["x = 5", "x = 10", "x = 7.5", "x = 20"],
            0,
            "Subtract 5 from both sides to get 2x = 10, then divide by 2: x = 5.",
        ),
        (
            "Which of these is a prime number?",
            ["9", "15", "17", "21"],
            2,
            "17 is prime because it is divisible only by 1 and itself.",
        ),
        (
            "What is the area of a circle with radius 7 cm? (π = 22/7)",
            ["154 cm²", "44 cm²", "308 cm²", "88 cm²"],
            0,
            "Area = πr² = (22/7) × 7 × 7 = 154 cm².",
        ),
        (
            "What is the derivative of f(x) = 3x² + 2x - 5?",
            ["6x + 2", "3x + 2", "6x - 5", "3x² + 2"],
            0,
            "The derivative of 3x² is 6x, of 2x is 2, and of a constant is 0.",
        ),
        (
            "What is sin 30°?",
            ["1/2", "√3/2", "√2/2", "1"],
            0,
            "sin 30° = 1/2 is one of the basic trigonometric values worth memorizing.",
        ),
    ];

    questions
        .into_iter()
        .zip(1_u64..)
        .map(|((prompt, options, correct, explanation), id)| -> Result<Item, ItemError> {
            let options = options.iter().map(|o| (*o).to_string()).collect();
            let question = Question::new(prompt, options, correct)?.with_explanation(explanation);
            Ok(Item::question(ItemId::new(id), question))
        })
        .collect()
}

const MATH_CARDS: &[(&str, &str)] = &[
    (
        "Area of a circle",
        "πr²\n\nwhere:\nπ = 3.14 or 22/7\nr = radius of the circle",
    ),
    (
        "Pythagorean theorem",
        "a² + b² = c²\n\nwhere:\na, b = legs\nc = hypotenuse",
    ),
    (
        "Quadratic formula",
        "x = (-b ± √(b²-4ac)) / 2a\n\nfor ax² + bx + c = 0",
    ),
    ("Volume of a sphere", "(4/3)πr³\n\nwhere:\nr = radius of the sphere"),
    ("Derivative of x^n", "nx^(n-1)\n\nExample: the derivative of x³ is 3x²"),
];

const PHYSICS_CARDS: &[(&str, &str)] = &[
    (
        "Newton's first law",
        "An object stays at rest or in uniform motion when the net force is zero\n\nΣF = 0",
    ),
    (
        "Newton's second law",
        "F = m × a\n\nwhere:\nF = force (N)\nm = mass (kg)\na = acceleration (m/s²)",
    ),
    (
        "Kinetic energy",
        "Ek = ½mv²\n\nwhere:\nm = mass (kg)\nv = velocity (m/s)",
    ),
    (
        "Ohm's law",
        "V = I × R\n\nwhere:\nV = voltage (V)\nI = current (A)\nR = resistance (Ω)",
    ),
    (
        "Pendulum period",
        "T = 2π√(L/g)\n\nwhere:\nL = string length\ng = gravitational acceleration",
    ),
];

const CHEMISTRY_CARDS: &[(&str, &str)] = &[
    ("Molecular formula of water", "H₂O\n\n2 hydrogen atoms + 1 oxygen atom"),
    ("pH of an acid", "pH < 7\n\nThe lower the pH, the more acidic"),
    ("pH of a base", "pH > 7\n\nThe higher the pH, the more basic"),
    ("Mole", "1 mol = 6.022 × 10²³ particles\n\n(Avogadro's number)"),
    (
        "Lavoisier's law",
        "Mass before reaction = mass after reaction\n\n(Law of conservation of mass)",
    ),
];

fn deck(
    id: SourceId,
    title: &str,
    subject: &str,
    cards: &[(&str, &str)],
) -> Result<ItemSource, StorageError> {
    let items = cards
        .iter()
        .zip(1_u64..)
        .map(|((front, back), item_id)| {
            CardFaces::new(*front, *back).map(|card| Item::card(ItemId::new(item_id), card))
        })
        .collect::<Result<Vec<_>, ItemError>>()?;
    Ok(ItemSource::new(id, title, subject, items)?)
}
