use dotenv::dotenv;
use finflow::llm::{AiNarrator, NarrationClient};
use finflow::*;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: ai_narration <statement.csv>")?;
    let file = ingest_file(&path)?;
    println!("✅ Ingested {} row(s) for {}\n", file.rows.len(), file.name);

    let analyzer = StatementAnalyzer::default();
    let report = analyzer.analyze_ingested(std::slice::from_ref(&file));

    let client = NarrationClient::from_env()?;
    println!("🤖 Asking {} for insights...\n", client.model());
    let narrator =
        AiNarrator::new(client).with_default_company(analyzer.config().default_company.clone());

    let ai_insights = match narrator.narrate(&report.rows).await {
        Ok(lines) if !lines.is_empty() => Some(lines),
        Ok(_) => None,
        Err(e) => {
            println!("⚠️  Narration failed, falling back to heuristics: {}", e);
            None
        }
    };

    let insights = select_insights(ai_insights, &report.rows);
    println!("{}", render_bullets(&insights));

    Ok(())
}
