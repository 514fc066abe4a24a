
#[macro_use] extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;

pub mod translator;
pub mod xml;

use clap::{Arg, ArgMatches, App, ErrorKind};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use translator::error::{Error, EXIT_INVOCATION, EXIT_SUCCESS};
use translator::parser::{Parser, Program};
use translator::stats::{self, Stat};

const STATS: [Stat; 4] = [Stat::Loc, Stat::Comments, Stat::Labels, Stat::Jumps];

fn main() {
    let args = match process_arguments(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => match err.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                std::process::exit(EXIT_INVOCATION);
            }
        },
    };
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tOutfile: {}\n\tInfile: {}\n\tStats file: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.value_of("output").unwrap_or("STDOUT"),
        args.value_of("INPUT").unwrap_or("STDIN"),
        args.value_of("stats").unwrap_or("None"),
    );

    let code = match run(&args) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            error!("fatal: {}", err);
            err.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(args: &ArgMatches) -> Result<(), Error> {
    // Flag problems are reported before any input is read.
    let selected = selected_stats(args)?;

    let program = match args.value_of("INPUT") {
        Some(ifile) => {
            let ipath = Path::new(ifile);
            let file = File::open(&ipath)
                .map_err(|err| Error::Input(format!("`{}`: {}", ipath.display(), err)))?;
            Parser::new().run(BufReader::new(file))?
        }
        None => {
            let stdin = io::stdin();
            let handle = stdin.lock();
            Parser::new().run(handle)?
        }
    };

    if args.is_present("print-debug") {
        print_debug(&program);
    }

    let mut document: Vec<u8> = Vec::new();
    xml::write_program(&mut document, &program.instructions)
        .map_err(|err| Error::Internal(err.to_string()))?;

    if args.is_present("verify") {
        verify(&document, &program)?;
    }

    match args.value_of("output") {
        Some(ofile) => write_file(Path::new(ofile), &document)?,
        None => io::stdout()
            .write_all(&document)
            .map_err(|err| Error::Output(format!("STDOUT: {}", err)))?,
    }

    if let Some(sfile) = args.value_of("stats") {
        let spath = Path::new(sfile);
        let mut file = File::create(&spath)
            .map_err(|err| Error::Output(format!("`{}`: {}", spath.display(), err)))?;
        stats::write_report(&mut file, &program.stats, &selected)
            .map_err(|err| Error::Output(format!("`{}`: {}", spath.display(), err)))?;
        info!("Wrote {} statistic(s) to `{}`.", selected.len(), spath.display());
    }

    Ok(())
}

/// Statistics flags in the order they were given on the command line.
fn selected_stats(args: &ArgMatches) -> Result<Vec<Stat>, Error> {
    let mut selected: Vec<(usize, Stat)> = STATS
        .iter()
        .filter_map(|stat| args.index_of(stat.flag()).map(|idx| (idx, *stat)))
        .collect();
    selected.sort_by_key(|(idx, _)| *idx);

    if let Some((_, stat)) = selected.first() {
        if !args.is_present("stats") {
            return Err(Error::Invocation(format!("{} requires --stats=FILE", stat)));
        }
    }
    Ok(selected.into_iter().map(|(_, stat)| stat).collect())
}

/// Reads the generated document back and compares it with what was translated.
fn verify(document: &[u8], program: &Program) -> Result<(), Error> {
    let text = std::str::from_utf8(document).map_err(|err| Error::Internal(err.to_string()))?;
    let reread = xml::read_program(text).map_err(|err| Error::Internal(err.to_string()))?;

    if reread != program.instructions {
        return Err(Error::Internal("generated XML does not match the translated instructions".to_owned()));
    }
    info!("Verified {} instruction(s) against the generated XML.", reread.len());
    Ok(())
}

fn write_file(opath: &Path, document: &[u8]) -> Result<(), Error> {
    let mut ofile = File::create(opath)
        .map_err(|err| Error::Output(format!("`{}`: {}", opath.display(), err)))?;
    ofile
        .write_all(document)
        .map_err(|err| Error::Output(format!("`{}`: {}", opath.display(), err)))
}

fn print_debug(program: &Program) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for ins in program.instructions.iter() {
        let operands: Vec<String> = ins.operands.iter().map(|op| op.to_string()).collect();
        grid.add(Cell::from(format!("{:>4}:", ins.order)));
        grid.add(Cell::from(ins.opcode.to_string()));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(if operands.is_empty() { "-".to_string() } else { operands.join(", ") }));
    }

    eprintln!("{}", grid.fit_into_columns(4));
    eprintln!("{:?}", program.stats);
}

fn process_arguments<I, T>(itr: I) -> Result<ArgMatches<'static>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    App::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use, reads STDIN when omitted")
            .required(false)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile instead of STDOUT"))
        .arg(Arg::with_name("stats")
            .long("stats")
            .takes_value(true)
            .value_name("FILE")
            .help("writes the selected statistics to FILE, one per line"))
        .arg(Arg::with_name("loc")
            .long("loc")
            .takes_value(false)
            .help("counts instructions"))
        .arg(Arg::with_name("comments")
            .long("comments")
            .takes_value(false)
            .help("counts lines with a comment"))
        .arg(Arg::with_name("labels")
            .long("labels")
            .takes_value(false)
            .help("counts distinct labels"))
        .arg(Arg::with_name("jumps")
            .long("jumps")
            .takes_value(false)
            .help("counts jump instructions"))
        .arg(Arg::with_name("verify")
            .short("c")
            .long("verify")
            .takes_value(false)
            .help("re-reads the generated XML and checks it against the translation"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .takes_value(false)
            .help("prints the translated instructions to STDERR"))
        .get_matches_from_safe(itr)
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        // STDOUT carries the XML document.
        .chain(std::io::stderr())
        .apply().ok();
}
