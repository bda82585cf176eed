extern crate blfract;
extern crate clap;
extern crate env_logger;
extern crate log;
extern crate num_cpus;

use blfract::driver::save_sequence;
use blfract::{Frame, Preset};
use clap::{App, Arg, ArgMatches};
use log::info;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const PRESET: &str = "preset";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const FRAMES: &str = "frames";
const PERCENT: &str = "percent";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("blfract")
        .version("0.1.0")
        .about("Fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image, or output directory when rendering frames"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("400x400")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(PRESET)
                .required(false)
                .long(PRESET)
                .short("p")
                .takes_value(true)
                .default_value("mandel")
                .possible_values(&Preset::names())
                .help("Which fractal to render"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver; defaults to one per CPU"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iterations per point; defaults to the preset's own"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .required(false)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Render an animation of this many frames into the output directory"),
        )
        .arg(
            Arg::with_name(PERCENT)
                .required(false)
                .long(PERCENT)
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        0.0,
                        1.0,
                        "Could not parse percent",
                        "Percent must be between 0 and 1",
                    )
                })
                .help("Animation position of a single image, from 0 to 1 (default 0)"),
        )
        .get_matches()
}

struct Settings {
    output: String,
    size: (usize, usize),
    preset: Preset,
    threads: usize,
    iterations: Option<u32>,
    frames: Option<usize>,
    percent: f64,
}

// Everything has passed its validator by now.
fn settings(matches: &ArgMatches) -> Result<Settings, String> {
    let value = |name: &str| matches.value_of(name).unwrap_or_default().to_string();
    let size = parse_pair(&value(SIZE), 'x').ok_or("Error parsing image dimensions")?;
    let preset = Preset::from_str(&value(PRESET)).map_err(|e| e.to_string())?;
    let threads = match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).map_err(|e| e.to_string())?,
        None => num_cpus::get(),
    };
    let iterations = match matches.value_of(ITERATIONS) {
        Some(s) => Some(u32::from_str(s).map_err(|e| e.to_string())?),
        None => None,
    };
    let frames = match matches.value_of(FRAMES) {
        Some(s) => Some(usize::from_str(s).map_err(|e| e.to_string())?),
        None => None,
    };
    let percent = match matches.value_of(PERCENT) {
        Some(s) => f64::from_str(s).map_err(|e| e.to_string())?,
        None => 0.0,
    };
    Ok(Settings {
        output: value(OUTPUT),
        size,
        preset,
        threads,
        iterations,
        frames,
        percent,
    })
}

fn run(settings: &Settings) -> blfract::Result<()> {
    let (width, height) = settings.size;
    let configure = |percent: f64| -> blfract::Result<Frame> {
        let mut frame = settings
            .preset
            .frame(width as f64, height as f64, percent)?;
        if let Some(budget) = settings.iterations {
            frame.budget = budget;
        }
        Ok(frame)
    };

    match settings.frames {
        Some(frames) => {
            let written = save_sequence(
                &settings.output,
                width,
                height,
                frames,
                settings.threads,
                configure,
            )?;
            info!("wrote {} frames of {}", written.len(), settings.preset);
        }
        None => {
            let frame = configure(settings.percent)?;
            let canvas = frame
                .pipeline
                .render(width, height, frame.budget, settings.threads)?;
            canvas.save(&settings.output)?;
            info!("wrote {} to {}", settings.preset, settings.output);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    let settings = match settings(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Argument failure: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(&settings) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
