use finflow::*;
use std::error::Error;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        return Err("usage: benchmark_csv <statement.csv|statement.txt>...".into());
    }

    println!("📂 Ingesting {} file(s)...\n", paths.len());
    let (files, failures) = ingest_files(&paths);
    for failure in &failures {
        println!("⚠️  Skipped {}: {}", failure.name, failure.error);
    }

    let analyzer = match std::env::var("FINFLOW_CONFIG") {
        Ok(path) => StatementAnalyzer::new(AnalysisConfig::from_json_file(path)?)?,
        Err(_) => StatementAnalyzer::default(),
    };
    let report = analyzer.analyze_ingested(&files);

    for group in &report.groups {
        println!("🏢 {}", group.company);
        for row in summary_table(group) {
            println!("{}", row.join(" | "));
        }
        println!();
    }

    println!("📊 Benchmarks");
    println!("{}\n", render_bullets(&report.benchmark_narrative));

    println!("💡 Insights");
    println!("{}", render_bullets(&report.insights));

    Ok(())
}
