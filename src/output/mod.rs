use crate::pipeline::PredictionReport;
use crate::error::AdrResult;
use std::path::Path;
use std::fs::File;
use log::info;

pub fn save_report<P: AsRef<Path>>(report: &PredictionReport, output_dir: P) -> AdrResult<()> {
    let output_path = output_dir.as_ref();
    std::fs::create_dir_all(output_path)?;

    save_json(report, &output_path.join("prediction.json"))?;
    save_effects(report, &output_path.join("effects.csv"))?;
    save_interactions(report, &output_path.join("interactions.csv"))?;
    std::fs::write(output_path.join("prediction_report.md"), render_markdown(report))?;

    info!("Prediction for '{}' saved to {:?}", report.drug_queried, output_path);
    Ok(())
}

fn save_json<P: AsRef<Path>>(report: &PredictionReport, path: P) -> AdrResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

fn save_effects<P: AsRef<Path>>(report: &PredictionReport, path: P) -> AdrResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "SIDE_EFFECT", "PROBABILITY", "SEVERITY", "FREQUENCY", "SOURCE",
        "RISK_FACTORS_MATCHED", "ONSET", "MANAGEMENT", "REQUIRES_DISCONTINUATION",
    ])?;

    for effect in &report.predictions {
        writer.write_record(&[
            effect.side_effect.clone(),
            effect.probability.to_string(),
            effect.severity.to_string(),
            effect.frequency.to_string(),
            effect.source.to_string(),
            effect.risk_factors_matched.join(";"),
            effect.onset.clone(),
            effect.management.clone(),
            effect.requires_discontinuation.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_interactions<P: AsRef<Path>>(report: &PredictionReport, path: P) -> AdrResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["DRUGS", "SEVERITY", "WARNING", "MECHANISM", "MANAGEMENT", "SOURCE"])?;

    for warning in &report.interactions {
        writer.write_record(&[
            warning.drugs.join(";"),
            warning.severity.clone(),
            warning.warning.clone(),
            warning.mechanism.clone(),
            warning.management.clone(),
            warning.source.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn render_markdown(report: &PredictionReport) -> String {
    let mut md = format!(
        r#"# Adverse Drug Effect Prediction: {}

## Overview
- **Matched drug**: {}
- **Personalized**: {}
- **Risk factors**: {}
- **Advisory analysis**: {}
- **Generated**: {}

"#,
        report.drug_queried,
        report.drug_found.as_deref().unwrap_or("not in knowledge base"),
        if report.personalized { "yes" } else { "no" },
        if report.user_risk_factors.is_empty() { "none".to_string() } else { report.user_risk_factors.join(", ") },
        if report.ai_enhanced { "included" } else { "not available" },
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    if !report.critical_alerts.is_empty() {
        md.push_str("## Critical Alerts\n");
        for alert in &report.critical_alerts {
            md.push_str(&format!("- {}\n", alert));
        }
        md.push('\n');
    }

    md.push_str("## Predicted Side Effects\n");
    md.push_str("| Side effect | Probability | Severity | Frequency | Source |\n");
    md.push_str("|---|---|---|---|---|\n");
    for effect in &report.predictions {
        md.push_str(&format!(
            "| {} | {}% | {} | {} | {} |\n",
            effect.side_effect, effect.probability, effect.severity, effect.frequency, effect.source
        ));
    }

    md.push_str("\n## Drug Interactions\n");
    if report.interactions.is_empty() {
        md.push_str("No interactions detected.\n");
    }
    for warning in &report.interactions {
        md.push_str(&format!(
            "- **{}** ({}): {} [{}]\n",
            warning.drugs.join(" + "),
            warning.severity,
            warning.warning,
            warning.source
        ));
    }

    if let Some(analysis) = &report.ai_analysis {
        md.push_str(&format!(
            "\n## Advisory Analysis\n- **Drug class**: {}\n- **Mechanism**: {}\n- **Overall risk**: {}\n",
            analysis.drug_class,
            analysis.mechanism_of_action,
            analysis.overall_risk_assessment.risk_level.as_deref().unwrap_or("not assessed"),
        ));
        for warning in &analysis.black_box_warnings {
            md.push_str(&format!("- **Black box warning**: {}\n", warning));
        }
    }

    md.push_str(&format!("\n## Notes\n{}\n", report.disclaimer));
    md
}
