//! Interactive stdin prompts for choosing what to analyse.

use std::io::{BufRead, Write};

use crate::clients::chess_com::Archive;
use crate::error::InsightsError;
use crate::filter::TimeClass;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> Result<(), InsightsError> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Next trimmed line. End of input is an error.
    fn read_line(&mut self) -> Result<String, InsightsError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InsightsError::Input("input closed".into()));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer.
    fn ask<T>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> Option<T>,
    ) -> Result<T, InsightsError> {
        self.say(question)?;
        loop {
            let answer = self.read_line()?;
            match parse(&answer) {
                Some(value) => return Ok(value),
                None => self.say(&format!("invalid choice {answer:?}, try again:"))?,
            }
        }
    }

    pub fn username(&mut self) -> Result<String, InsightsError> {
        self.ask("input username below:", |s| {
            let valid = !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            valid.then(|| s.to_string())
        })
    }

    /// Year within the player's archive range. Two-digit years mean 20xx.
    pub fn year(&mut self, archives: &[Archive]) -> Result<i32, InsightsError> {
        let (Some(first), Some(last)) = (archives.first(), archives.last()) else {
            return Err(InsightsError::Input("player has no game archives".into()));
        };
        let (first, last) = (first.year, last.year);

        self.ask(&format!("select a year between {first} and {last}"), |s| {
            let year: i32 = s.parse().ok()?;
            let year = if (0..100).contains(&year) { 2000 + year } else { year };
            (first..=last).contains(&year).then_some(year)
        })
    }

    /// Month of `year`, listing the months that have archives.
    pub fn month(&mut self, year: i32, archives: &[Archive]) -> Result<u32, InsightsError> {
        let available: Vec<String> = archives
            .iter()
            .filter(|a| a.year == year)
            .map(|a| format!("{}: {}", MONTHS[(a.month - 1) as usize], a.month))
            .collect();

        self.say("select a month to analyze:")?;
        for line in &available {
            self.say(line)?;
        }
        self.ask("month number:", |s| {
            let month: u32 = s.parse().ok()?;
            (1..=12).contains(&month).then_some(month)
        })
    }

    pub fn time_class(&mut self) -> Result<TimeClass, InsightsError> {
        self.ask("input time class: 0: rapid, 1: blitz, 2: bullet", |s| {
            s.parse().ok().and_then(TimeClass::from_index)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::chess_com::parse_archive_url;

    fn archives() -> Vec<Archive> {
        ["2022/12", "2023/02", "2023/03"]
            .iter()
            .filter_map(|ym| parse_archive_url(&format!("https://api.chess.com/pub/player/x/games/{ym}")))
            .collect()
    }

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_full_session() {
        let archives = archives();
        let mut p = prompter("Hikaru\n23\n2\n1\n");
        assert_eq!(p.username().unwrap(), "Hikaru");
        assert_eq!(p.year(&archives).unwrap(), 2023);
        assert_eq!(p.month(2023, &archives).unwrap(), 2);
        assert_eq!(p.time_class().unwrap(), TimeClass::Blitz);

        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("select a year between 2022 and 2023"));
        assert!(shown.contains("Feb: 2"));
        assert!(shown.contains("Mar: 3"));
        assert!(!shown.contains("Dec: 12"));
    }

    #[test]
    fn test_invalid_answers_are_reprompted() {
        let archives = archives();
        let mut p = prompter("1999\nabc\n2022\n7\n");
        assert_eq!(p.year(&archives).unwrap(), 2022);
        assert_eq!(p.time_class().unwrap_err().to_string(), "Input error: input closed");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(matches!(p.username(), Err(InsightsError::Input(_))));
    }
}
