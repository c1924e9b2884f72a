// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Melody files and the buzzer symbol type.
//!
//! Two text formats are understood, both with `#` comments:
//!
//! - simple: one `frequency:seconds` pair per line, frequency `0` is a rest.
//! - note names: comma or whitespace separated `NAME:divider` tokens such as
//!   `NOTE_C4:4`, `A4:-8` or `REST:2`. The divider is a fraction of a whole
//!   note, negative for dotted notes. A `# Tempo: N BPM` comment sets the
//!   tempo, 120 BPM otherwise.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Step, Symbol};
use crate::assets::{AssetEntry, list_entries, read_entry};
use crate::error::LoadError;

const DEFAULT_TEMPO: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Tone(u32),
    Rest,
    Unknown(String),
}

impl Note {
    pub fn frequency(&self) -> Option<u32> {
        match self {
            Note::Tone(hz) if *hz > 0 => Some(*hz),
            _ => None,
        }
    }
}

impl Symbol for Note {
    fn is_rest(&self) -> bool {
        matches!(self, Note::Rest | Note::Tone(0))
    }

    fn is_known(&self) -> bool {
        !matches!(self, Note::Unknown(_))
    }
}

/// Equal-tempered frequency of a note name such as `C4`, `NOTE_DS5` or
/// `F#3`, rounded to the nearest hertz.
pub fn note_frequency(name: &str) -> Option<u32> {
    let name = name.trim();
    let name = name.strip_prefix("NOTE_").unwrap_or(name);
    let mut chars = name.chars();

    let semitone = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (sharp, octave) = match rest.strip_prefix(['S', 's', '#']) {
        Some(octave) => (1, octave),
        None => (0, rest),
    };
    let octave: i32 = octave.parse().ok()?;
    if !(0..=8).contains(&octave) {
        return None;
    }

    let midi = (octave + 1) * 12 + semitone + sharp;
    let hz = 440.0 * 2f64.powf(f64::from(midi - 69) / 12.0);
    Some(hz.round() as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MelodyFormat {
    Simple,
    NoteNames,
}

impl MelodyFormat {
    pub fn detect(content: &str) -> Self {
        let named = tokens(content).any(|token| {
            token
                .split_once(':')
                .is_some_and(|(name, _)| name.trim().parse::<u32>().is_err())
        });
        if named {
            MelodyFormat::NoteNames
        } else {
            MelodyFormat::Simple
        }
    }
}

/// Parses melody text in either format. Unparseable tokens are logged and
/// dropped.
pub fn parse_melody(content: &str) -> Vec<Step<Note>> {
    match MelodyFormat::detect(content) {
        MelodyFormat::Simple => parse_simple(content),
        MelodyFormat::NoteNames => parse_note_names(content),
    }
}

fn tokens(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split([',', ' ', '\t']))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn parse_simple(content: &str) -> Vec<Step<Note>> {
    tokens(content)
        .filter_map(|token| {
            let parsed = token.split_once(':').and_then(|(hz, secs)| {
                Some((hz.trim().parse::<u32>().ok()?, secs.trim().parse::<f64>().ok()?))
            });
            if parsed.is_none() {
                warn!("ignoring melody token '{}'", token);
            }
            parsed
        })
        .map(|(hz, secs)| {
            let note = if hz == 0 { Note::Rest } else { Note::Tone(hz) };
            Step::new(note, secs)
        })
        .collect()
}

fn parse_note_names(content: &str) -> Vec<Step<Note>> {
    let tempo = tempo(content).unwrap_or(DEFAULT_TEMPO);
    let whole_note_secs = f64::from(240_000 / tempo) / 1000.0;
    debug!("melody tempo {} BPM", tempo);

    let mut steps = Vec::new();
    for token in tokens(content) {
        let Some((name, divider)) = token.split_once(':') else {
            warn!("ignoring melody token '{}'", token);
            continue;
        };
        let Ok(divider) = divider.trim().parse::<i32>() else {
            warn!("ignoring melody token '{}'", token);
            continue;
        };
        if divider == 0 {
            continue;
        }

        let mut secs = whole_note_secs / f64::from(divider.unsigned_abs());
        if divider < 0 {
            secs *= 1.5;
        }
        let name = name.trim();
        let note = if name.eq_ignore_ascii_case("REST") {
            Note::Rest
        } else {
            note_frequency(name)
                .map(Note::Tone)
                .unwrap_or_else(|| Note::Unknown(name.to_string()))
        };
        steps.push(Step::new(note, secs));
    }
    steps
}

fn tempo(content: &str) -> Option<u32> {
    content.lines().find_map(|line| {
        let comment = line.trim().strip_prefix('#')?.trim();
        let value = comment
            .strip_prefix("Tempo:")
            .or_else(|| comment.strip_prefix("tempo:"))?;
        let value = value.trim().trim_end_matches("BPM").trim();
        value.parse::<u32>().ok().filter(|bpm| *bpm > 0)
    })
}

/// Source of step sequences by identifier.
pub trait SequenceLoader<S> {
    fn load(&self, id: &str) -> Result<Vec<Step<S>>, LoadError>;
}

/// Loads `id`, logging a failure and returning an empty sequence in its
/// place.
pub fn load_or_empty<S>(loader: &dyn SequenceLoader<S>, id: &str) -> Vec<Step<S>> {
    loader.load(id).unwrap_or_else(|e| {
        warn!("{}", e);
        Vec::new()
    })
}

/// Directory of melody text files.
#[derive(Debug, Clone)]
pub struct MelodyDir {
    root: PathBuf,
}

impl MelodyDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Melody files directly inside the directory, sorted by file name.
    pub fn list(&self) -> Vec<AssetEntry> {
        list_entries(&self.root)
    }
}

impl SequenceLoader<Note> for MelodyDir {
    fn load(&self, id: &str) -> Result<Vec<Step<Note>>, LoadError> {
        let content = read_entry(&self.root, id)?;
        let steps = parse_melody(&content);
        if steps.is_empty() {
            return Err(LoadError::Malformed {
                id: id.to_string(),
                reason: "no playable steps".to_string(),
            });
        }
        debug!("loaded {} steps from {}", steps.len(), self.root.join(id).display());
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::hardware::fake::RecordingActuator;
    use crate::sequencer::Sequencer;

    #[test]
    fn test_note_frequencies() {
        assert_eq!(note_frequency("A4"), Some(440));
        assert_eq!(note_frequency("NOTE_C4"), Some(262));
        assert_eq!(note_frequency("NOTE_CS4"), Some(277));
        assert_eq!(note_frequency("G4"), Some(392));
        assert_eq!(note_frequency("B0"), Some(31));
        assert_eq!(note_frequency("NOTE_DS8"), Some(4978));
        assert_eq!(note_frequency("H4"), None);
        assert_eq!(note_frequency("C9"), None);
    }

    #[test]
    fn test_simple_format() {
        let steps = parse_melody("# intro\n440:0.5\n0:0.25\n392:1.0\n");
        assert_eq!(
            steps,
            vec![
                Step::new(Note::Tone(440), 0.5),
                Step::new(Note::Rest, 0.25),
                Step::new(Note::Tone(392), 1.0),
            ]
        );
    }

    #[test]
    fn test_note_name_format_with_tempo() {
        let content = "# Tempo: 60 BPM\nNOTE_A4:4, REST:2\nNOTE_C4:-4, NOTE_E4:0\n";
        assert_eq!(MelodyFormat::detect(content), MelodyFormat::NoteNames);
        let steps = parse_melody(content);
        assert_eq!(
            steps,
            vec![
                Step::new(Note::Tone(440), 1.0),
                Step::new(Note::Rest, 2.0),
                Step::new(Note::Tone(262), 1.5),
            ]
        );
    }

    #[test]
    fn test_unknown_note_name_is_kept_as_unknown() {
        let steps = parse_melody("NOTE_X9:4");
        assert_eq!(steps, vec![Step::new(Note::Unknown("NOTE_X9".into()), 0.5)]);
        assert!(steps[0].is_malformed());
    }

    #[test]
    fn test_oversized_duration_is_skipped_when_played() {
        let steps = parse_melody("440:1e30\n392:0.1\n");
        assert_eq!(steps.len(), 2);
        assert!(steps[0].is_malformed());

        let mut buzzer = RecordingActuator::<Note>::new();
        let mut sequencer = Sequencer::default();
        sequencer.start(steps, Duration::ZERO);
        sequencer.update(Duration::ZERO, &mut buzzer);

        assert_eq!(sequencer.diagnostics().skipped, 1);
        assert_eq!(
            buzzer.emitted(),
            vec![(Note::Tone(392), Duration::from_millis(100))]
        );
    }

    #[test]
    fn test_tone_zero_is_rest() {
        assert!(Note::Tone(0).is_rest());
        assert_eq!(Note::Tone(0).frequency(), None);
    }

    #[test]
    fn test_list_sorted_with_titles() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ode_to_joy.txt"), "440:1").unwrap();
        fs::write(dir.path().join("happy_birthday.txt"), "440:1").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let melodies = MelodyDir::new(dir.path()).list();
        let titles: Vec<_> = melodies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["happy birthday", "ode to joy"]);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.txt"), "# nothing here\n").unwrap();
        let melodies = MelodyDir::new(dir.path());

        assert!(matches!(
            melodies.load("missing.txt"),
            Err(LoadError::NotFound(_))
        ));
        assert!(matches!(
            melodies.load("empty.txt"),
            Err(LoadError::Malformed { .. })
        ));
        assert!(load_or_empty::<Note>(&melodies, "missing.txt").is_empty());
    }
}
