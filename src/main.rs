use srtdoc::{intake, parse_subtitles, serialiser};
use srtdoc::{DocumentOptions, ParseOptions, SrtDocError, SubtitleFormat};

use std::io;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use log::{info, LevelFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Turn SRT subtitles into a plain narrative document")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the document will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(
        long,
        value_name = "FORMAT",
        help = "The subtitle format (srt, ass or sup). Detected from the file extension if not supplied."
    )]
    format: Option<String>,
    #[arg(long, help = "Move a leading 'Name:' prefix out of the text and into the speaker.")]
    speaker_names: bool,
    #[arg(long, help = "Do not merge consecutive lines from the same speaker.")]
    no_merge: bool,
    #[arg(long, help = "Keep entries whose text is empty.")]
    keep_empty: bool,
    #[arg(long, help = "Do not trim whitespace around subtitle text.")]
    no_trim: bool,
    #[arg(long, value_name = "TEXT", help = "The document title.", default_value = "Subtitles")]
    title: String,
    #[arg(long, help = "Do not write a title.", conflicts_with = "title")]
    no_title: bool,
    #[arg(long, help = "Number each paragraph.")]
    line_numbers: bool,
    #[arg(long, help = "Prefix each paragraph with its time range.")]
    timestamps: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Log more detail. May be repeated.")]
    verbose: u8,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            remove_speaker_names: self.speaker_names,
            merge_consecutive_lines: !self.no_merge,
            remove_empty_lines: !self.keep_empty,
            trim_whitespace: !self.no_trim,
        }
    }

    fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            title: if self.no_title {
                None
            } else {
                Some(self.title.clone())
            },
            include_line_numbers: self.line_numbers,
            include_timestamps: self.timestamps,
        }
    }

    fn subtitle_format(&self) -> Result<SubtitleFormat> {
        match &self.format {
            Some(name) => SubtitleFormat::from_extension(name)
                .ok_or_else(|| SrtDocError::UnsupportedFormat(name.clone()).into()),
            None if self.input == "-" => Ok(SubtitleFormat::Srt),
            None => Ok(intake::detect_format(&self.input)?),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.subtitle_format()?;
    // Other formats may be binary and are rejected by the parser anyway.
    let data = match format {
        SubtitleFormat::Srt => intake::read_input(&cli.input)?,
        _ => String::new(),
    };

    let result = parse_subtitles(&data, format, &cli.parse_options());
    if !result.success {
        let msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        return Err(SrtDocError::ParseError(msg))
            .context(format!("Failed to parse subtitle file: '{}'", cli.input));
    }
    if result.content.is_empty() {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }
    info!("Writing {} paragraphs", result.line_count);

    let opts = cli.document_options();
    if cli.output == "-" {
        serialiser::serialise(&result.content, &opts, io::stdout())?;
    } else {
        let dst = std::fs::File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        serialiser::serialise(&result.content, &opts, dst)?;
    };

    Ok(())
}
