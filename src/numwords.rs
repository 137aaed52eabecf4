//! Number → English words, uppercase ("FORTY TWO").
//!
//! Covers 0..=999. Anything larger comes back as its digit string; the number
//! drills never ask for more than 299.

const ONES: [&str; 20] = [
  "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
  "TEN", "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN",
  "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 10] = [
  "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

pub fn number_to_words(n: u32) -> String {
  match n {
    0..=19 => ONES[n as usize].to_string(),
    20..=99 => {
      let tens = TENS[(n / 10) as usize];
      match n % 10 {
        0 => tens.to_string(),
        rest => format!("{} {}", tens, ONES[rest as usize]),
      }
    }
    100..=999 => {
      let head = format!("{} HUNDRED", ONES[(n / 100) as usize]);
      match n % 100 {
        0 => head,
        rest => format!("{} {}", head, number_to_words(rest)),
      }
    }
    _ => n.to_string(),
  }
}
