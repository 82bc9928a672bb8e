use anyhow::{Context, Result, anyhow, bail};
use buscaminas_core::{Coord, Coord2, DifficultyPreset};

/// A line of player input, parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open(Coord2),
    Flag(Coord2),
    Pause,
    Reset,
    Difficulty(DifficultyPreset),
    Mute,
    Ranking,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  o ROW COL       open a cell
  f ROW COL       toggle a flag
  p               pause / resume
  r               new game
  d easy|medium|hard
                  change difficulty
  m               mute / unmute
  k               show ranking
  h               this help
  q               quit";

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_lowercase().as_str() {
            "o" | "open" => Self::Open(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "p" | "pause" => Self::Pause,
            "r" | "reset" => Self::Reset,
            "d" | "difficulty" => {
                let name = words.next().context("missing difficulty")?;
                Self::Difficulty(name.parse()?)
            }
            "m" | "mute" => Self::Mute,
            "k" | "ranking" => Self::Ranking,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, type h for help"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected {extra:?}");
        }
        Ok(Some(command))
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let mut next = |axis: &str| -> Result<Coord> {
        let word = words.next().ok_or_else(|| anyhow!("missing {axis}"))?;
        word.parse::<Coord>()
            .with_context(|| format!("invalid {axis} {word:?}"))
    };
    Ok((next("row")?, next("col")?))
}
