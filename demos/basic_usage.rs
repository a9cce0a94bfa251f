use survival_records::{
    io::{read_clinical_records, write_survival_records},
    BuilderConfig, CohortSummary, ColumnMap, SurvivalRecordBuilder, UnknownStatusPolicy,
};

const CLINICAL: &str = "\
Patient ID,CT Date,Date of Last Known Alive,Days between CT and surgery,Survival Status
LUNG1-001,09/15/2008,02/03/2011,21,Death
LUNG1-002,03/02/2009,11/20/2013,,Alive
LUNG1-003,06/30/2009,06/30/2010,14,death
LUNG1-004,01/12/2010,12/02/2009,0,Alive
LUNG1-005,04/04/2010,,7,Death
LUNG1-006,10/10/2010,10/10/2012,30,
LUNG1-007,11/11/2010,05/01/2013,5,Lost to follow-up
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Survival Records - Basic Usage Example");
    println!("======================================\n");

    let records = read_clinical_records(CLINICAL.as_bytes(), &ColumnMap::default(), b',')?;
    println!("read {} clinical rows\n", records.len());

    // Example 1: unknown statuses treated as censored
    println!("Example 1: unknown status -> censored");
    println!("-------------------------------------");

    let builder = SurvivalRecordBuilder::new(BuilderConfig::new(UnknownStatusPolicy::Censor))?;
    let out = builder.build(&records)?;

    CohortSummary::compute(&out.table)?.print();
    println!();
    out.diagnostics.print();
    println!();

    // Example 2: unknown statuses left out entirely
    println!("Example 2: unknown status -> excluded");
    println!("-------------------------------------");

    let strict = SurvivalRecordBuilder::new(BuilderConfig::new(UnknownStatusPolicy::Exclude))?;
    let out = strict.build(&records)?;
    println!("kept {} of {} subjects, skipped {:?}\n",
             out.table.n_subjects(), records.len(), out.diagnostics.skipped());

    // Example 3: only unflagged rows, ready for a model's (duration, event) input
    println!("Example 3: model-ready table");
    println!("----------------------------");

    let model_ready = out.table.valid_only();
    println!("durations: {:?}", model_ready.times().to_vec());
    println!("events:    {:?}\n", model_ready.events().to_vec());

    write_survival_records(std::io::stdout(), &model_ready)?;

    Ok(())
}
