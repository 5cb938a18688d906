// Wed Jan 15 2026 - Alex

use super::args::{Args, CandidatesArgs, Command, InfoArgs, ScanArgs};
use crate::config::Config;
use crate::memory::{AddressSpace, BinaryImage, ImageReader};
use crate::orchestrator::{likely_function_offsets, ParallelScanner};
use crate::output::{write_output, OutputFormatter, SymbolKind, SymbolList};
use crate::signature::{LoadReport, RelocKind, SignatureDatabase};
use crate::ui::progress::ScanProgress;
use crate::ui::status::Status;
use crate::utils::logging::{init_logging, level_from_str, raise_level, ScopedTimer};
use crate::utils::{format_bytes, format_duration, pluralize};
use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

pub struct CommandHandler {
    status: Status,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            status: Status::default(),
        }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.status = Status::new(args.quiet);
        if args.no_color {
            colored::control::set_override(false);
        }

        self.setup_logging(&args);
        self.status.banner();

        match args.command {
            Command::Scan(scan_args) => self.handle_scan(scan_args),
            Command::Info(info_args) => self.handle_info(info_args),
            Command::Candidates(candidates_args) => self.handle_candidates(candidates_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = raise_level(level_from_str(&args.log_level), args.verbose);
        init_logging(level);
    }

    fn handle_scan(&self, args: ScanArgs) -> anyhow::Result<()> {
        let base = match &args.config {
            Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        let config = args.apply(base).map_err(|e| anyhow!(e))?;
        config.validate().map_err(|e| anyhow!(e))?;

        let start = Instant::now();
        let binary = config
            .binary
            .as_deref()
            .ok_or_else(|| anyhow!("A binary image must be given"))?;

        let image = self.load_image(binary)?;
        let database = self.load_signatures(&config.signature_files, config.allow_partial_database)?;

        let candidates = if config.thorough {
            None
        } else {
            let offsets = likely_function_offsets(&image);
            self.status.info(format!("{} likely function offsets", offsets.len()));
            Some(offsets)
        };
        let policy = config.scan_policy(candidates);

        self.status.info(format!(
            "Scanning {} ({}) on {} threads",
            pluralize(database.len(), "signature", "signatures"),
            if policy.is_exhaustive() { "thorough" } else { "targeted" },
            config.threads
        ));

        let scanner = ParallelScanner::new(config.threads).with_policy(policy);
        let mut progress = ScanProgress::new(database.len(), config.show_progress && !self.status.is_quiet());
        let report = {
            let _timer = ScopedTimer::new("scan");
            scanner.run(&image, database.as_slice(), |event| progress.on_event(event))?
        };
        progress.finish();

        self.status.success(format!(
            "Matched {} of {}, {} references recovered",
            report.matched_count(),
            report.scanned,
            report.relocation_count()
        ));

        let symbols = SymbolList::from_report(&report, &config.address_space());
        let rendered = OutputFormatter::new(config.output_format).render(&symbols)?;
        write_output(&rendered, config.output_file.as_deref())?;

        self.status.success(format!(
            "{} symbols ({} code, {} data) in {}",
            symbols.len(),
            symbols.count_kind(SymbolKind::Code),
            symbols.count_kind(SymbolKind::Data),
            format_duration(start.elapsed())
        ));
        Ok(())
    }

    fn handle_info(&self, args: InfoArgs) -> anyhow::Result<()> {
        let (database, report) = SignatureDatabase::load_all(&args.signatures)?;

        if args.list {
            for signature in database.iter() {
                println!("{}", signature);
            }
        }

        println!("{}", "Signature database".cyan().bold());
        println!("  {}: {}", "Files".bold(), args.signatures.len());
        println!("  {}: {}", "Signatures".bold(), database.len());
        println!("  {}: {}", "Code size".bold(), format_bytes(database.total_bytes()));
        for kind in RelocKind::ALL {
            println!("  {}: {}", kind.directive().bold(), database.relocation_count(kind));
        }
        println!("  {}: {}", "Rejected".bold(), report.rejected.len());

        self.report_rejected(&report);

        if let Some(path) = &args.export {
            write_output(&database.to_sig_v1(), Some(path))?;
            self.status.success(format!("Exported {} to {}", pluralize(database.len(), "signature", "signatures"), path.display()));
        }
        Ok(())
    }

    fn handle_candidates(&self, args: CandidatesArgs) -> anyhow::Result<()> {
        let image = self.load_image(&args.binary)?;
        let space = AddressSpace::new(args.base, args.header_size);
        let offsets = likely_function_offsets(&image);
        let limit = args.limit.unwrap_or(offsets.len());

        for &offset in offsets.iter().take(limit) {
            match space.to_address(offset) {
                Ok(address) => println!("{:#010x}  {}", offset, address),
                Err(_) => println!("{:#010x}  {}", offset, "-".repeat(8)),
            }
        }

        self.status.success(format!("{} likely function offsets", offsets.len()));
        Ok(())
    }

    fn load_image(&self, path: &Path) -> anyhow::Result<BinaryImage> {
        self.status.info(format!("Loading binary: {}", path.display()));
        let image = BinaryImage::load(path).with_context(|| format!("loading {}", path.display()))?;
        self.status.success(format!(
            "Loaded {} ({})",
            format_bytes(image.len() as u64),
            image.original_order()
        ));
        Ok(image)
    }

    fn load_signatures<P: AsRef<Path>>(&self, paths: &[P], allow_partial: bool) -> anyhow::Result<SignatureDatabase> {
        let (database, report) = SignatureDatabase::load_all(paths)?;
        self.report_rejected(&report);

        if !report.is_complete() && !allow_partial {
            bail!("{} signature records were rejected", report.rejected.len());
        }
        if database.is_empty() {
            bail!("No usable signatures were loaded");
        }

        self.status.success(format!("Loaded {}", pluralize(database.len(), "signature", "signatures")));
        Ok(database)
    }

    fn report_rejected(&self, report: &LoadReport) {
        for rejected in &report.rejected {
            let location = match (&rejected.source, rejected.line) {
                (Some(source), Some(line)) => format!("{}:{}", source.display(), line),
                (Some(source), None) => source.display().to_string(),
                (None, Some(line)) => format!("line {}", line),
                (None, None) => String::from("<input>"),
            };
            self.status.warning(format!("{}: {}", location, rejected.error));
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::*;
    use clap::Parser;
    use std::fs;

    fn planted_function() -> FunctionBuilder {
        FunctionBuilder::new("osExample")
            .word(addiu(SP, SP, -0x18))
            .word(sw(RA, SP, 0x14))
            .reloc(RelocKind::Targ26, "callee", jal(0x8000_1000))
            .word(NOP)
            .word(lw(RA, SP, 0x14))
            .word(JR_RA)
            .word(addiu(SP, SP, 0x18))
    }

    fn execute(argv: &[&str]) -> anyhow::Result<()> {
        let args = Args::try_parse_from(argv)?;
        CommandHandler::new().execute(args)
    }

    #[test]
    fn test_scan_writes_pj64_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let function = planted_function();

        let mut image = vec![0u8; 0x800];
        image[0x400..0x400 + function.bytes().len()].copy_from_slice(&function.bytes());
        let image_path = dir.path().join("game.z64");
        fs::write(&image_path, &image).unwrap();

        let sig_dir = dir.path().join("sigs").join("libultra");
        fs::create_dir_all(&sig_dir).unwrap();
        let mut database = SignatureDatabase::new();
        database.add_signature(function.signature());
        fs::write(sig_dir.join("os.sig"), database.to_sig_v1()).unwrap();

        let out_path = dir.path().join("symbols.txt");
        let sigs = dir.path().join("sigs");
        execute(&[
            "sigmatch",
            "-q",
            "scan",
            image_path.to_str().unwrap(),
            "-s",
            sigs.to_str().unwrap(),
            "--no-progress",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(
            fs::read_to_string(&out_path).unwrap(),
            "80000400,code,osExample\n80001000,code,callee\n"
        );
    }

    #[test]
    fn test_scan_without_usable_signatures_fails() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("game.z64");
        fs::write(&image_path, vec![0u8; 0x100]).unwrap();
        let sig_path = dir.path().join("broken.sig");
        fs::write(&sig_path, "odd 3 0 0\n").unwrap();

        let result = execute(&[
            "sigmatch",
            "-q",
            "scan",
            image_path.to_str().unwrap(),
            "-s",
            sig_path.to_str().unwrap(),
            "--no-progress",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_info_exports_merged_database() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("a.json");
        fs::write(&json_path, r#"[{ "name": "first", "size": 8, "crc_a": 1, "crc_b": 2 }]"#).unwrap();
        let text_path = dir.path().join("b.sig");
        fs::write(&text_path, "second 4 3 4\n .targ26 first 0\n").unwrap();
        let export_path = dir.path().join("merged.sig");

        execute(&[
            "sigmatch",
            "-q",
            "info",
            json_path.to_str().unwrap(),
            text_path.to_str().unwrap(),
            "-e",
            export_path.to_str().unwrap(),
        ])
        .unwrap();

        let (merged, report) = SignatureDatabase::load(&export_path).unwrap();
        assert!(report.is_complete());
        let names: Vec<&str> = merged.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(merged.relocation_count(RelocKind::Targ26), 1);
    }
}
