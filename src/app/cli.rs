use crate::{
    core::{
        model::record::{SyncReport, UploadRecord},
        repo::record::RecordRepo,
        service::record::RecordService,
    },
    err,
    error::{CasekitErr, CasekitError},
};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List uploaded files, newest first.
    List,

    /// Upload an XMind file and preview its test cases.
    Upload(UploadArg),

    /// Preview the test cases of an uploaded file.
    Preview(RecordArg),

    /// Generate the Zentao CSV of an uploaded file and save a copy.
    Export(OutArg),

    /// Save a copy of an uploaded XMind file.
    Download(OutArg),

    /// Delete an upload, its CSV and its record.
    Delete(RecordArg),

    /// Reconcile the records with the upload directory.
    Sync,
}

#[derive(Debug, Args, Default, Clone)]
pub struct UploadArg {
    /// The XMind file to upload.
    pub path: Option<PathBuf>,

    /// Annotation stored with the record.
    #[arg(long, short)]
    pub note: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RecordArg {
    /// File name in the upload directory.
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    pub name: Option<String>,

    /// Record ID.
    #[arg(long, short)]
    pub id: Option<i64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct OutArg {
    #[command(flatten)]
    pub record: RecordArg,

    /// Where to save the copy. Defaults to the file name in the working directory.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub async fn run<R>(command: Command, service: &RecordService<R>) -> Result<(), CasekitError>
where
    R: RecordRepo + Send + Sync,
{
    match command {
        Command::List => print_records(&service.list().await?),
        Command::Upload(UploadArg { path, note }) => {
            let (record, preview) = match service.upload(path.as_deref(), note.as_deref()).await {
                Ok(uploaded) => uploaded,
                Err(e) if matches!(e.error, CasekitErr::NoSelection) => {
                    println!("Please select an XMind file to convert.");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            println!("Uploaded {} ({})", record.name, record.created_at);
            println!();
            print!("{preview}");
        }
        Command::Preview(arg) => {
            let name = resolve(service, arg).await?;
            print!("{}", service.preview(&name).await?);
        }
        Command::Export(OutArg { record, out }) => {
            let name = resolve(service, record).await?;
            let destination = service.export_csv(&name, out.as_deref()).await?;
            println!("File saved to {}", destination.display());
        }
        Command::Download(OutArg { record, out }) => {
            let name = resolve(service, record).await?;
            let destination = service.download(&name, out.as_deref()).await?;
            println!("File saved to {}", destination.display());
        }
        Command::Delete(RecordArg { id: Some(id), .. }) => {
            let record = service.delete_by_id(id).await?;
            println!("Deleted {}", record.name);
        }
        Command::Delete(RecordArg { name, .. }) => {
            let Some(name) = name else {
                return err!(NoSelection);
            };
            let removed = service.delete(&name).await?;
            println!("Deleted {name} ({removed} records)");
        }
        Command::Sync => print_sync(&service.sync().await?),
    }

    Ok(())
}

/// Get the file name a record argument points to.
async fn resolve<R>(service: &RecordService<R>, arg: RecordArg) -> Result<String, CasekitError>
where
    R: RecordRepo + Send + Sync,
{
    match arg {
        RecordArg { name: Some(name), .. } => Ok(name),
        RecordArg { id: Some(id), .. } => Ok(service.get_record(id).await?.name),
        RecordArg { .. } => err!(NoSelection),
    }
}

fn print_records(records: &[UploadRecord]) {
    println!("{:>6}  {:<20}  NAME", "ID", "TIME");
    for record in records {
        println!(
            "{:>6}  {:<20}  {}",
            record.id, record.created_at, record.name
        );
    }
    println!("Total records: {}", records.len());
}

fn print_sync(report: &SyncReport) {
    for record in report.pruned.iter() {
        println!("Pruned {} ({})", record.name, record.id);
    }
    for record in report.registered.iter() {
        println!("Registered {} ({})", record.name, record.id);
    }
    println!(
        "Sync finished, {} pruned, {} registered",
        report.pruned.len(),
        report.registered.len()
    );
}

#[cfg(test)]
mod tests {
    use super::{Command, OutArg, RecordArg, UploadArg};
    use crate::config::StartArgs;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Command {
        StartArgs::try_parse_from(std::iter::once("casekit").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn upload_without_path() {
        let Command::Upload(UploadArg { path, note }) = parse(&["upload"]) else {
            panic!("expected upload");
        };
        assert!(path.is_none());
        assert!(note.is_none());
    }

    #[test]
    fn export_by_name_with_destination() {
        let Command::Export(OutArg { record, out }) =
            parse(&["export", "plan.xmind", "--out", "/tmp/plan.csv"])
        else {
            panic!("expected export");
        };
        assert_eq!(Some("plan.xmind".to_string()), record.name);
        assert_eq!(Some(PathBuf::from("/tmp/plan.csv")), out);
    }

    #[test]
    fn delete_by_id() {
        let Command::Delete(RecordArg { name, id }) = parse(&["delete", "--id", "7"]) else {
            panic!("expected delete");
        };
        assert!(name.is_none());
        assert_eq!(Some(7), id);
    }

    #[test]
    fn record_argument_is_required() {
        assert!(StartArgs::try_parse_from(["casekit", "preview"]).is_err());
        assert!(StartArgs::try_parse_from(["casekit", "preview", "a.xmind", "--id", "1"]).is_err());
    }
}
