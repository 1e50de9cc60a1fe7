use nom::{bytes::complete as by, character::complete as ch, sequence::preceded};

use crate::core::commands::prefix::{Args, PrefixCommand, PrefixCommands};

pub struct Invoke<'i> {
    pub cmd: &'static PrefixCommand,
    pub args: Args<'i>,
}

impl<'i> Invoke<'i> {
    /// Resolve the longest registered path out of the leading words, the
    /// remaining input being the arguments.
    pub fn parse(input: &'i str) -> Option<Self> {
        Self::parse_with(PrefixCommands::get(), input)
    }

    fn parse_with(commands: &PrefixCommands, input: &'i str) -> Option<Self> {
        let mut words = Vec::with_capacity(commands.max_depth());
        let mut rest = input;

        while words.len() < commands.max_depth() {
            let mut word = preceded::<_, _, _, (), _, _>(
                ch::multispace0,
                by::take_till1(char::is_whitespace),
            );

            let Ok((remaining, word)) = word(rest) else {
                break;
            };

            words.push((word.to_ascii_lowercase(), remaining));
            rest = remaining;
        }

        (1..=words.len()).rev().find_map(|depth| {
            let path = words[..depth]
                .iter()
                .map(|(word, _)| word.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            commands.command(&path).map(|cmd| Self {
                cmd,
                args: Args::new(words[depth - 1].1.trim_start()),
            })
        })
    }
}
