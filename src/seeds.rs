//! Built-in corpus (Spanish → English). Guarantees every drill is playable
//! without an external config file.

use std::collections::BTreeMap;

use crate::domain::{GrammarItem, HangmanItem, SentenceItem, VocabularyItem};

pub const DAYS: [&str; 7] = [
  "MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY", "SUNDAY",
];

pub const MONTHS: [&str; 12] = [
  "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE",
  "JULY", "AUGUST", "SEPTEMBER", "OCTOBER", "NOVEMBER", "DECEMBER",
];

fn words(pairs: &[(&str, &str)]) -> Vec<VocabularyItem> {
  pairs
    .iter()
    .map(|(source, target)| VocabularyItem { source: source.to_string(), target: target.to_string(), image: None })
    .collect()
}

fn pictures(pairs: &[(&str, &str)]) -> Vec<VocabularyItem> {
  pairs
    .iter()
    .map(|(source, target)| VocabularyItem {
      source: source.to_string(),
      target: target.to_string(),
      image: Some(format!("img/{}.png", target.to_lowercase())),
    })
    .collect()
}

/// Word categories keyed by name.
pub fn seed_categories() -> BTreeMap<String, Vec<VocabularyItem>> {
  let mut m = BTreeMap::new();
  m.insert("translate".to_string(), words(&[
    ("casa", "HOUSE"), ("perro", "DOG"), ("libro", "BOOK"), ("agua", "WATER"),
    ("mesa", "TABLE"), ("ventana", "WINDOW"), ("escuela", "SCHOOL"), ("coche", "CAR"),
    ("árbol", "TREE"), ("sol", "SUN"), ("luna", "MOON"), ("puerta", "DOOR"),
    ("silla", "CHAIR"), ("ciudad", "CITY"), ("calle", "STREET"), ("tiempo", "TIME"),
  ]));
  m.insert("pictures".to_string(), pictures(&[
    ("manzana", "APPLE"), ("gato", "CAT"), ("reloj", "CLOCK"), ("pelota", "BALL"),
    ("zapato", "SHOE"), ("llave", "KEY"), ("barco", "BOAT"), ("flor", "FLOWER"),
  ]));
  m.insert("colors".to_string(), words(&[
    ("rojo", "RED"), ("azul", "BLUE"), ("verde", "GREEN"), ("amarillo", "YELLOW"),
    ("negro", "BLACK"), ("blanco", "WHITE"), ("naranja", "ORANGE"), ("morado", "PURPLE"),
  ]));
  m.insert("animals".to_string(), words(&[
    ("caballo", "HORSE"), ("vaca", "COW"), ("pájaro", "BIRD"), ("pez", "FISH"),
    ("conejo", "RABBIT"), ("oveja", "SHEEP"), ("ratón", "MOUSE"), ("león", "LION"),
  ]));
  m.insert("food".to_string(), words(&[
    ("pan", "BREAD"), ("queso", "CHEESE"), ("leche", "MILK"), ("huevo", "EGG"),
    ("arroz", "RICE"), ("pollo", "CHICKEN"), ("sopa", "SOUP"), ("azúcar", "SUGAR"),
  ]));
  m.insert("body".to_string(), words(&[
    ("cabeza", "HEAD"), ("mano", "HAND"), ("pie", "FOOT"), ("ojo", "EYE"),
    ("boca", "MOUTH"), ("nariz", "NOSE"), ("oreja", "EAR"), ("brazo", "ARM"),
  ]));
  m.insert("family".to_string(), words(&[
    ("madre", "MOTHER"), ("padre", "FATHER"), ("hermano", "BROTHER"), ("hermana", "SISTER"),
    ("abuelo", "GRANDFATHER"), ("abuela", "GRANDMOTHER"), ("hijo", "SON"), ("hija", "DAUGHTER"),
  ]));
  m.insert("numbers".to_string(), words(&[
    ("uno", "ONE"), ("dos", "TWO"), ("tres", "THREE"), ("cuatro", "FOUR"),
    ("cinco", "FIVE"), ("seis", "SIX"), ("siete", "SEVEN"), ("ocho", "EIGHT"),
    ("nueve", "NINE"), ("diez", "TEN"),
  ]));
  m
}

/// Words for the letter-assembly drill. Targets are uppercase A–Z only.
pub fn seed_spelling() -> Vec<VocabularyItem> {
  words(&[
    ("gato", "CAT"), ("sol", "SUN"), ("pez", "FISH"), ("libro", "BOOK"),
    ("mesa", "TABLE"), ("verde", "GREEN"), ("tren", "TRAIN"), ("playa", "BEACH"),
    ("jardín", "GARDEN"), ("invierno", "WINTER"), ("cocina", "KITCHEN"), ("mariposa", "BUTTERFLY"),
  ])
}

pub fn seed_sentences() -> Vec<SentenceItem> {
  fn s(text: &str, translation: &str) -> SentenceItem {
    SentenceItem {
      tokens: text.split_whitespace().map(str::to_string).collect(),
      translation: translation.to_string(),
    }
  }
  vec![
    s("I like green apples", "Me gustan las manzanas verdes"),
    s("The dog is sleeping", "El perro está durmiendo"),
    s("We go to school by bus", "Vamos a la escuela en autobús"),
    s("She has two brothers", "Ella tiene dos hermanos"),
    s("It is very cold today", "Hoy hace mucho frío"),
    s("My father reads the newspaper", "Mi padre lee el periódico"),
    s("They are playing in the park", "Ellos están jugando en el parque"),
    s("Where is the station", "Dónde está la estación"),
  ]
}

pub fn seed_grammar() -> Vec<GrammarItem> {
  fn g(text: &str, wrong_index: usize, correct: &str, options: [&str; 4]) -> GrammarItem {
    GrammarItem {
      tokens: text.split_whitespace().map(str::to_string).collect(),
      wrong_index,
      correct: correct.to_string(),
      options: options.iter().map(|o| o.to_string()).collect(),
    }
  }
  vec![
    g("She go to work every day", 1, "goes", ["goes", "going", "gone", "goed"]),
    g("They is my friends", 1, "are", ["are", "am", "be", "was"]),
    g("I have two cat", 3, "cats", ["cats", "cat's", "cates", "caties"]),
    g("He can swims very well", 2, "swim", ["swim", "swimming", "swam", "swum"]),
    g("We was at home yesterday", 1, "were", ["were", "is", "are", "be"]),
    g("This is an big house", 2, "a", ["a", "the", "any", "one"]),
  ]
}

pub fn seed_hangman() -> Vec<HangmanItem> {
  fn h(word: &str, hint: &str) -> HangmanItem {
    HangmanItem { word: word.to_string(), hint: hint.to_string() }
  }
  vec![
    h("ELEPHANT", "A very large grey animal"),
    h("GUITAR", "A musical instrument with strings"),
    h("PENCIL", "You write or draw with it"),
    h("WINDOW", "You look outside through it"),
    h("ORANGE", "A fruit and a color"),
    h("BICYCLE", "It has two wheels and pedals"),
    h("KITCHEN", "The room where you cook"),
    h("SUMMER", "The hottest season"),
    h("DOCTOR", "Works in a hospital"),
    h("RAINBOW", "Colors in the sky after rain"),
  ]
}
