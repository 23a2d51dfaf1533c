//! Dice descriptors
//!
//! Parses and rolls notation like "2d6+3", "1d4x10", and the hit-dice
//! shorthand "3+1" (three six-sided dice plus one). The same descriptor is
//! used for rolling and for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::rng::GameRng;

/// Sides on a hit die when the shorthand notation is used
pub const HIT_DIE_SIDES: u32 = 6;

/// A dice specification: `number`d`sides` × `multiplier` + `addition`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dice {
    pub number: u32,
    pub sides: u32,
    pub multiplier: i32,
    pub addition: i32,
}

impl Dice {
    pub const fn new(number: u32, sides: u32) -> Self {
        Self {
            number,
            sides,
            multiplier: 1,
            addition: 0,
        }
    }

    /// Hit dice in the shorthand sense: `number` six-sided dice plus `addition`
    pub const fn hit_dice(number: u32, addition: i32) -> Self {
        Self {
            number,
            sides: HIT_DIE_SIDES,
            multiplier: 1,
            addition,
        }
    }

    pub const fn with_addition(mut self, addition: i32) -> Self {
        self.addition = addition;
        self
    }

    pub const fn with_multiplier(mut self, multiplier: i32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// A fixed amount with no dice
    pub const fn flat(amount: i32) -> Self {
        Self {
            number: 0,
            sides: 0,
            multiplier: 1,
            addition: amount,
        }
    }

    /// Roll the dice and return the total
    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        self.scale(rng.dice(self.number, self.sides))
    }

    pub fn min(&self) -> i32 {
        self.scale(if self.sides == 0 { 0 } else { self.number })
    }

    pub fn max(&self) -> i32 {
        self.scale(self.number.saturating_mul(self.sides))
    }

    /// Apply multiplier and addition to a raw dice total, saturating at
    /// the bounds of `i32`
    fn scale(&self, total: u32) -> i32 {
        i32::try_from(total)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.multiplier)
            .saturating_add(self.addition)
    }

    pub fn average(&self) -> f64 {
        if self.sides == 0 {
            return self.addition as f64;
        }
        let per_die = (1.0 + self.sides as f64) / 2.0;
        self.number as f64 * per_die * self.multiplier as f64 + self.addition as f64
    }

    /// True when these dice can only ever produce zero (a harmless attack)
    pub fn is_zero(&self) -> bool {
        self.max() <= 0
    }

    /// Display as hit dice
    pub fn hit_dice_label(&self) -> HitDiceLabel<'_> {
        HitDiceLabel(self)
    }

    /// Level equivalent when these are hit dice. Fractional hit dice
    /// (fewer than six sides) count for half.
    pub fn level(&self) -> u32 {
        if self.sides >= HIT_DIE_SIDES {
            self.number
        } else {
            self.number / 2
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new(1, 6)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.number == 0 || self.sides == 0 {
            return write!(f, "{}", self.addition);
        }
        write!(f, "{}d{}", self.number, self.sides)?;
        if self.multiplier != 1 {
            write!(f, "x{}", self.multiplier)?;
        }
        write_addition(f, self.addition)
    }
}

fn write_addition(f: &mut fmt::Formatter<'_>, addition: i32) -> fmt::Result {
    match addition {
        0 => Ok(()),
        a if a > 0 => write!(f, "+{a}"),
        a => write!(f, "{a}"),
    }
}

/// Hit-dice rendering: the "3+1" shorthand for six-sided dice, full
/// notation otherwise.
pub struct HitDiceLabel<'a>(&'a Dice);

impl fmt::Display for HitDiceLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = self.0;
        if dice.sides == HIT_DIE_SIDES && dice.multiplier == 1 && dice.number > 0 {
            write!(f, "{}", dice.number)?;
            write_addition(f, dice.addition)
        } else {
            fmt::Display::fmt(dice, f)
        }
    }
}

impl FromStr for Dice {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let fail = |reason: &str| ArenaError::DiceParse {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        if input.is_empty() {
            return Err(fail("empty"));
        }

        // Split off a trailing +A / -A (a leading sign is a flat amount)
        let tail = input.get(1..).unwrap_or("");
        let (body, addition) = match tail.rfind(['+', '-']) {
            Some(pos) => {
                let pos = pos + 1;
                let addition = input[pos..]
                    .parse::<i32>()
                    .map_err(|_| fail("bad addition"))?;
                (&input[..pos], addition)
            }
            None => (input.as_str(), 0),
        };

        let (body, multiplier) = match body.split_once('x') {
            Some((dice, mult)) => {
                let mult = mult.parse::<i32>().map_err(|_| fail("bad multiplier"))?;
                (dice, mult)
            }
            None => (body, 1),
        };

        match body.split_once('d') {
            Some((number, sides)) => {
                let number = if number.is_empty() {
                    1
                } else {
                    number.parse::<u32>().map_err(|_| fail("bad dice count"))?
                };
                let sides = sides.parse::<u32>().map_err(|_| fail("bad dice sides"))?;
                Ok(Dice {
                    number,
                    sides,
                    multiplier,
                    addition,
                })
            }
            None => {
                let number = body.parse::<i64>().map_err(|_| fail("bad hit dice"))?;
                if number < 0 {
                    return Ok(Dice::flat(number as i32 + addition));
                }
                Ok(Dice {
                    number: number as u32,
                    sides: HIT_DIE_SIDES,
                    multiplier,
                    addition,
                })
            }
        }
    }
}

impl TryFrom<String> for Dice {
    type Error = ArenaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dice> for String {
    fn from(value: Dice) -> Self {
        value.to_string()
    }
}
