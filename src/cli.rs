use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use owo_colors::{OwoColorize, Stream};
use ron::ser::PrettyConfig;
use serde::Serialize;
use tracing::{debug, info};

use mcfn::errors::{Error, DEFAULT_RENDER_WIDTH};
use mcfn::parse::{
    normalize, parse_lines_lossy, parse_with, tokenize_with, NoExtension, ParserConfig,
    TokenizerConfig, DEFAULT_RECURSION_LIMIT,
};
use mcfn::source::SourceFile;

#[derive(ClapParser, Debug, Clone)]
#[command(version, about)]
pub struct McfnCli {
    /// Input files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// The last pipeline stage to run
    #[arg(short, long, value_enum, default_value_t = Stage::Parser)]
    pub stage: Stage,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Debug)]
    pub format: OutputFormat,

    /// Let a backslash at the end of a line continue the command
    #[arg(short, long)]
    pub multiline: bool,

    /// Terminal width used to clip source excerpts
    #[arg(short, long, default_value_t = DEFAULT_RENDER_WIDTH)]
    pub width: usize,

    /// Report every malformed line instead of stopping at the first one
    #[arg(long)]
    pub lossy: bool,

    #[arg(long, default_value_t = DEFAULT_RECURSION_LIMIT)]
    pub recursion_limit: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexer,
    Normalizer,
    Parser,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Debug,
    Ron,
}

impl McfnCli {
    pub fn run(self) -> ExitCode {
        let mut failed = false;

        for path in &self.paths {
            let source = match SourceFile::load(path.clone()) {
                Ok(source) => source,

                Err(e) => {
                    print_failure(&format!("could not read {}: {}", path.display(), e));
                    failed = true;

                    continue;
                }
            };

            debug!(path = %path.display(), "loaded the file");

            if !self.process(&source) {
                failed = true;
            }
        }

        if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Returns `false` if any error has been reported.
    fn process(&self, source: &SourceFile) -> bool {
        let tokenizer_config = TokenizerConfig {
            line_continuation: self.multiline,
        };

        let tokens = match tokenize_with(source.text(), tokenizer_config) {
            Ok(tokens) => tokens,

            Err(e) => {
                self.print_error(source, &e.into());

                return false;
            }
        };

        match self.stage {
            Stage::Lexer => self.dump(&tokens),
            Stage::Normalizer => self.dump(&normalize(tokens)),
            Stage::Parser => self.parse(source, tokens),
        }
    }

    fn parse(&self, source: &SourceFile, tokens: Vec<mcfn::parse::Token<'_>>) -> bool {
        let config = ParserConfig {
            recursion_limit: self.recursion_limit,
        };

        if self.lossy {
            let (nodes, errors) = parse_lines_lossy(tokens, config, &mut NoExtension);
            info!(
                nodes = nodes.len(),
                errors = errors.len(),
                "parsed {}",
                source.path().display()
            );

            for e in &errors {
                self.print_error(source, &e.clone().into());
            }

            self.dump(&nodes) && errors.is_empty()
        } else {
            match parse_with(tokens, config, &mut NoExtension) {
                Ok(nodes) => self.dump(&nodes),

                Err(e) => {
                    self.print_error(source, &e.into());

                    false
                }
            }
        }
    }

    fn dump<T: Serialize + Debug + ?Sized>(&self, value: &T) -> bool {
        match self.format {
            OutputFormat::Debug => {
                println!("{:#?}", value);

                true
            }

            OutputFormat::Ron => match ron::ser::to_string_pretty(value, PrettyConfig::default()) {
                Ok(dump) => {
                    println!("{}", dump);

                    true
                }

                Err(e) => {
                    print_failure(&format!("could not serialize the output: {}", e));

                    false
                }
            },
        }
    }

    fn print_error(&self, source: &SourceFile, error: &Error) {
        let rendered = error.render(source, self.width);
        let body = rendered.strip_prefix("error").unwrap_or(&rendered);

        eprintln!(
            "{}{}",
            "error".if_supports_color(Stream::Stderr, |text| text.bright_red()),
            body
        );
    }
}

fn print_failure(message: &str) {
    eprintln!(
        "{}: {}",
        "fatal".if_supports_color(Stream::Stderr, |text| text.red()),
        message
    );
}
