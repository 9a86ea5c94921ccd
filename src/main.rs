use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use sheetfill::domain::{default_marks, ReportMonth};
use sheetfill::error::{Error, Result, ResultExt};
use sheetfill::handlers::parse_label;
use sheetfill::{fill_template, logger, records, sample, ReportConfig, UmyaWorkbook};

#[derive(Parser, Debug)]
#[command(name = "sheetfill")]
#[command(version, about = "Fill an Excel attendance template for one month")]
pub struct Args {
    /// Template to fill (.xlsx, .xlsm or .xls)
    pub input: PathBuf,

    /// Output workbook (default: <input>.filled.xlsx next to the template)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report month as YYYY-MM (default: current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Employee CSV: id,name,table_id,position followed by one column per day
    #[arg(short, long, conflicts_with = "fake")]
    pub employees: Option<PathBuf>,

    /// Legend CSV: name,key (default: built-in marks)
    #[arg(long)]
    pub marks: Option<PathBuf>,

    /// Generate this many fake employees instead of reading a CSV
    #[arg(long)]
    pub fake: Option<usize>,

    /// Seed for --fake
    #[arg(long, requires = "fake")]
    pub seed: Option<u64>,

    /// Value for {{working_time}}
    #[arg(long, default_value = sheetfill::report::DEFAULT_WORKING_TIME)]
    pub working_time: String,

    /// Extra label as KEY=VALUE, e.g. "{{org}}=Rast" (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Print detailed progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();
    logger::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    input.with_file_name(format!("{}.filled.xlsx", stem))
}

fn run(args: Args) -> Result<()> {
    let month = match &args.month {
        Some(text) => ReportMonth::parse(text)?,
        None => ReportMonth::current(),
    };
    log::info!("month: {} {} ({} days)", month.name(), month.year(), month.days());

    let employees = match (&args.employees, args.fake) {
        (Some(path), _) => records::load_employees(path)?,
        (None, Some(count)) => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            sample::generate_employees(count, month, &mut rng)
        }
        (None, None) => Vec::new(),
    };
    log::info!("employees: {}", employees.len());

    let mut config = ReportConfig::new(month, employees);
    config.working_time = args.working_time.clone();
    config.marks = match &args.marks {
        Some(path) => records::load_marks(path)?,
        None => default_marks(),
    };
    config.labels = args
        .labels
        .iter()
        .map(|label| parse_label(label))
        .collect::<Result<_>>()?;

    log::info!("reading: {:?}", args.input);
    let book = UmyaWorkbook::open(&args.input)?;
    let book = fill_template(book, &config)
        .context(|| args.input.display().to_string())?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));
    if output == args.input {
        return Err(Error::Save(format!(
            "refusing to overwrite the template {}",
            output.display()
        )));
    }
    log::info!("output: {:?}", output);
    book.save(&output)
}
