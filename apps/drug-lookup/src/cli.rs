use clap::{Parser, Subcommand, ValueEnum};
use drug_gateway::PrescriptionFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Query the drug database from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Prescription access filter as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PrescriptionArg {
    #[value(name = "has_prescription")]
    HasPrescription,
    #[value(name = "otc_only")]
    OtcOnly,
    #[default]
    #[value(name = "either")]
    Either,
}

impl From<PrescriptionArg> for PrescriptionFilter {
    fn from(arg: PrescriptionArg) -> Self {
        match arg {
            PrescriptionArg::HasPrescription => PrescriptionFilter::HasPrescription,
            PrescriptionArg::OtcOnly => PrescriptionFilter::OtcOnly,
            PrescriptionArg::Either => PrescriptionFilter::Either,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// 1-based page index.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    #[arg(long)]
    pub page_size: Option<i64>,

    #[arg(long, value_enum, default_value_t = PrescriptionArg::Either)]
    pub prescription: PrescriptionArg,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest products for a partial name.
    Autocomplete { query: String },

    /// Search products by name.
    SearchName {
        query: String,
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Search products by primary and secondary symptom category.
    SearchSymptom {
        primary: String,
        secondary: String,
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Search by ATC code, administration route and/or package type.
    SearchAdvanced {
        #[arg(long)]
        atc: Option<String>,
        #[arg(long)]
        route: Option<String>,
        #[arg(long)]
        package: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Full record for a registration number, e.g. "020 16 20534 00".
    Detail { registration_number: String },

    /// Symptom category tree.
    Symptoms,

    /// Most searched symptoms.
    Popular {
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        rows: i64,
    },

    /// Level-4 ATC groups.
    AtcGroups,

    /// Package types.
    Packages,

    /// Administration routes.
    Routes,

    /// Print the URL of a product image.
    ImageUrl { image_id: String },
}
