use libledgerfeed::importer::{
    extract, FtPriceImporter, Importer, LsePriceImporter, PayslipImporter, SourceFile,
};
use tracing::warn;

use crate::cli::{ExtractArgs, Provider};
use crate::error::CliError;

pub fn run(args: &ExtractArgs) -> Result<(), CliError> {
    let fetcher = super::fetcher(None)?;
    let prices: Box<dyn Importer> = match args.provider {
        Provider::Lse => Box::new(LsePriceImporter::new(&args.currency, fetcher)),
        Provider::Ft => Box::new(FtPriceImporter::new(&args.currency, fetcher)),
    };
    let payslips = PayslipImporter::new(args.payslip.payslip(&args.currency));
    let importers: [&dyn Importer; 2] = [prices.as_ref(), &payslips];

    for path in &args.files {
        let file = SourceFile::new(path);
        match extract(&importers, &file)? {
            Some(directives) => {
                for directive in directives {
                    println!("{directive}");
                }
            }
            None => warn!(file = %path.display(), "no importer recognises this file"),
        }
    }
    Ok(())
}
