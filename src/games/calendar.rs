//! Calendar game: "If today is X, what is the date N days later?"

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CalendarCfg;
use crate::error::{GameError, GameResult};

pub const DAYS: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

pub const MONTHS: [&str; 12] = [
  "January", "February", "March", "April", "May", "June",
  "July", "August", "September", "October", "November", "December",
];

/// Distractors land this many days (at most) after the correct date.
const MAX_DISTRACTOR_OFFSET: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateOption {
  pub date: String,
  pub day_of_week: String,
  pub is_correct: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarQuestion {
  pub base_date: NaiveDate,
  pub days_to_add: u32,
  pub target_date: NaiveDate,
  pub options: Vec<DateOption>,
}

impl CalendarQuestion {
  pub fn is_correct(&self, option_index: usize) -> bool {
    self.options.get(option_index).is_some_and(|o| o.is_correct)
  }
}

pub fn day_of_week(date: NaiveDate) -> &'static str {
  DAYS[date.weekday().num_days_from_sunday() as usize]
}

pub fn add_days(date: NaiveDate, n: u64) -> GameResult<NaiveDate> {
  date.checked_add_days(Days::new(n)).ok_or(GameError::DateOutOfRange)
}

fn ordinal_suffix(day: u32) -> &'static str {
  if (11..=13).contains(&day) {
    return "th";
  }
  match day % 10 {
    1 => "st",
    2 => "nd",
    3 => "rd",
    _ => "th",
  }
}

/// "3rd March", "11th June", "22nd May".
pub fn format_date(date: NaiveDate) -> String {
  let day = date.day();
  format!("{}{} {}", day, ordinal_suffix(day), MONTHS[date.month0() as usize])
}

/// `count` dates after `correct` whose formatted strings are pairwise distinct
/// and distinct from the correct one. Gives up after `max_attempts` draws.
pub fn generate_distractor_dates<R: Rng + ?Sized>(
  rng: &mut R,
  correct: NaiveDate,
  count: usize,
  max_attempts: usize,
) -> GameResult<Vec<NaiveDate>> {
  let mut used: HashSet<String> = HashSet::from([format_date(correct)]);
  let mut out = Vec::with_capacity(count);

  for _ in 0..max_attempts {
    if out.len() == count {
      break;
    }
    let candidate = add_days(correct, rng.gen_range(1..=MAX_DISTRACTOR_OFFSET))?;
    if used.insert(format_date(candidate)) {
      out.push(candidate);
    }
  }

  if out.len() < count {
    return Err(GameError::Exhausted { what: "distractor dates", attempts: max_attempts });
  }
  Ok(out)
}

fn random_date<R: Rng + ?Sized>(rng: &mut R, year_min: i32, year_max: i32) -> GameResult<NaiveDate> {
  let start = NaiveDate::from_ymd_opt(year_min, 1, 1).ok_or(GameError::DateOutOfRange)?;
  let end = NaiveDate::from_ymd_opt(year_max, 12, 31).ok_or(GameError::DateOutOfRange)?;
  let span = (end - start).num_days();
  add_days(start, rng.gen_range(0..=span) as u64)
}

pub fn generate_calendar_question<R: Rng + ?Sized>(
  rng: &mut R,
  cfg: &CalendarCfg,
  max_attempts: usize,
) -> GameResult<CalendarQuestion> {
  if cfg.year_min > cfg.year_max || cfg.max_days_to_add == 0 {
    return Err(GameError::invalid("calendar year range or day delta is empty"));
  }
  let base_date = random_date(rng, cfg.year_min, cfg.year_max)?;
  let days_to_add = rng.gen_range(1..=cfg.max_days_to_add);
  let target_date = add_days(base_date, days_to_add as u64)?;

  let mut options: Vec<DateOption> =
    generate_distractor_dates(rng, target_date, cfg.distractors, max_attempts)?
      .into_iter()
      .map(|d| DateOption { date: format_date(d), day_of_week: day_of_week(d).to_string(), is_correct: false })
      .collect();
  options.push(DateOption {
    date: format_date(target_date),
    day_of_week: day_of_week(target_date).to_string(),
    is_correct: true,
  });
  options.shuffle(rng);

  Ok(CalendarQuestion { base_date, days_to_add, target_date, options })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rng::game_rng;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn weekday_table_is_sunday_first() {
    assert_eq!(day_of_week(ymd(2024, 3, 3)), "Sunday");
    assert_eq!(day_of_week(ymd(2024, 2, 29)), "Thursday");
  }

  #[test]
  fn add_days_rolls_months_and_years() {
    assert_eq!(add_days(ymd(2024, 2, 28), 1).unwrap(), ymd(2024, 2, 29));
    assert_eq!(add_days(ymd(2023, 2, 28), 1).unwrap(), ymd(2023, 3, 1));
    assert_eq!(add_days(ymd(2024, 12, 25), 10).unwrap(), ymd(2025, 1, 4));
    assert_eq!(add_days(NaiveDate::MAX, 1), Err(GameError::DateOutOfRange));
  }

  #[test]
  fn ordinal_formatting() {
    assert_eq!(format_date(ymd(2024, 3, 3)), "3rd March");
    assert_eq!(format_date(ymd(2024, 1, 1)), "1st January");
    assert_eq!(format_date(ymd(2024, 5, 22)), "22nd May");
    assert_eq!(format_date(ymd(2024, 6, 11)), "11th June");
    assert_eq!(format_date(ymd(2024, 6, 12)), "12th June");
    assert_eq!(format_date(ymd(2024, 6, 13)), "13th June");
    assert_eq!(format_date(ymd(2024, 8, 21)), "21st August");
    assert_eq!(format_date(ymd(2024, 8, 31)), "31st August");
    assert_eq!(format_date(ymd(2024, 8, 24)), "24th August");
  }

  #[test]
  fn distractors_are_distinct_and_exclude_correct() {
    let correct = ymd(2024, 12, 28);
    for seed in 0..50 {
      let mut rng = game_rng(Some(seed));
      let ds = generate_distractor_dates(&mut rng, correct, 3, 64).unwrap();
      let mut names: HashSet<String> = ds.iter().map(|d| format_date(*d)).collect();
      assert_eq!(names.len(), 3);
      assert!(names.insert(format_date(correct)));
      assert!(ds.iter().all(|d| *d > correct && (*d - correct).num_days() <= 10));
    }
  }

  #[test]
  fn distractor_loop_is_bounded() {
    let mut rng = game_rng(Some(1));
    // Only ten distinct offsets exist, so eleven can never be found.
    let err = generate_distractor_dates(&mut rng, ymd(2024, 1, 1), 11, 500).unwrap_err();
    assert_eq!(err, GameError::Exhausted { what: "distractor dates", attempts: 500 });
  }

  #[test]
  fn generated_questions_hold_invariants() {
    let cfg = CalendarCfg::default();
    for seed in 0..100 {
      let mut rng = game_rng(Some(seed));
      let q = generate_calendar_question(&mut rng, &cfg, 64).unwrap();
      assert_eq!(q.options.len(), 4);
      assert_eq!(q.options.iter().filter(|o| o.is_correct).count(), 1);
      let distinct: HashSet<&str> = q.options.iter().map(|o| o.date.as_str()).collect();
      assert_eq!(distinct.len(), 4);
      assert!((1..=15).contains(&q.days_to_add));
      assert_eq!(q.base_date.year(), 2024);
      let correct = q.options.iter().find(|o| o.is_correct).unwrap();
      assert_eq!(correct.date, format_date(q.target_date));
      assert_eq!(correct.day_of_week, day_of_week(q.target_date));
      assert_eq!(add_days(q.base_date, q.days_to_add as u64).unwrap(), q.target_date);
    }
  }
}
