use std::io::{self, Write};
use std::path::PathBuf;
use structopt::StructOpt;

use crate::pipeline::{Pipeline, PipelineConfig};
use crate::watch::Lines;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "glyphfix",
    about = "repair literal <sub> markup and <0xHH> byte runs in rendered text",
)]
enum Cli {
    Normalize {
        /// Input file; stdin when omitted (one text unit per line).
        #[structopt(short, long, parse(from_os_str))]
        source: Option<PathBuf>,
        /// Output file; stdout when omitted.
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        #[structopt(short, long)]
        verbose: bool,
    },
}

pub fn run_cli() {
    match Cli::from_args() {
        Cli::Normalize { source, output, verbose } => {
            let pipeline = Pipeline::new(PipelineConfig { verbose });
            let result = match source {
                Some(path) => {
                    let text = std::fs::read_to_string(&path).unwrap();
                    pipeline.normalize(&text)
                }
                None => {
                    let stdin = io::stdin();
                    let lines = crate::watch::drive(Lines::new(stdin.lock()), &pipeline);
                    let mut result = lines.join("\n");
                    if !result.is_empty() {
                        result.push('\n');
                    }
                    result
                }
            };
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        let _ = std::fs::create_dir_all(parent);
                    }
                    std::fs::write(&path, result).unwrap();
                }
                None => {
                    io::stdout().write_all(result.as_bytes()).unwrap();
                }
            }
        }
    }
}
