use crate::infra::{InMemoryEnrichmentSink, InMemoryProfileRepository};
use clap::Args;
use founder_ai::error::AppError;
use founder_ai::interview::{
    AnswerValue, CatalogOutline, InterviewService, QuestionCatalog, SessionStateView,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the catalog outline before running the scripted interview.
    #[arg(long)]
    pub(crate) include_outline: bool,
    /// Skip the backward navigation portion of the demo.
    #[arg(long)]
    pub(crate) skip_revision: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OutlineArgs {
    /// Emit the outline as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_catalog_outline(args: OutlineArgs) -> Result<(), AppError> {
    let outline = CatalogOutline::from_catalog(&QuestionCatalog::founder_onboarding());

    if args.json {
        match serde_json::to_string_pretty(&outline) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Outline unavailable: {err}"),
        }
        return Ok(());
    }

    render_catalog_outline(&outline);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        include_outline,
        skip_revision,
    } = args;

    println!("Founder interview demo");

    let catalog = QuestionCatalog::founder_onboarding();
    if include_outline {
        println!();
        render_catalog_outline(&CatalogOutline::from_catalog(&catalog));
    }

    let enrichment = Arc::new(InMemoryEnrichmentSink::default());
    let service = Arc::new(InterviewService::new(
        catalog,
        Arc::new(InMemoryProfileRepository::default()),
        enrichment.clone(),
        16,
    ));

    let started = service.start()?;
    let session_id = started.session_id.clone();
    println!("\nStarted session {session_id}");
    render_state(&started);

    // a revenue-stage founder raising a seed round walks the longest path
    let script = [
        AnswerValue::scalar("b2b_saas"),
        AnswerValue::scalar("live"),
        AnswerValue::scalar("yes"),
        AnswerValue::scalar("5200"),
        AnswerValue::scalar("23"),
        AnswerValue::scalar("founder_sales"),
        AnswerValue::selections(["analytics", "integrations", "reporting"]),
        AnswerValue::scalar("integrations"),
        AnswerValue::scalar("4"),
        AnswerValue::scalar("seed"),
        AnswerValue::scalar("2000000"),
        AnswerValue::scalar("Quiet infrastructure behind every seed-stage back office."),
    ];

    for value in script {
        let view = match service.submit(&session_id, value) {
            Ok(view) => view,
            Err(err) => {
                println!("  Answer rejected: {err}");
                return Ok(());
            }
        };
        render_state(&view);
    }

    if !skip_revision {
        println!("\nRevising the funding stage");
        for _ in 0..3 {
            service.back(&session_id)?;
        }
        let reopened = service.state(&session_id)?;
        render_state(&reopened);

        let revised = match service.submit(&session_id, AnswerValue::scalar("bootstrapped")) {
            Ok(view) => view,
            Err(err) => {
                println!("  Answer rejected: {err}");
                return Ok(());
            }
        };
        render_state(&revised);

        let finished = match service.submit(
            &session_id,
            AnswerValue::scalar("Quiet infrastructure behind every bootstrapped back office."),
        ) {
            Ok(view) => view,
            Err(err) => {
                println!("  Answer rejected: {err}");
                return Ok(());
            }
        };
        render_state(&finished);
    }

    println!("\nStored profile");
    let record = service.profile(&session_id)?;
    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  Profile payload unavailable: {err}"),
    }

    let requests = enrichment.requests();
    if requests.is_empty() {
        println!("\nEnrichment requests: none dispatched");
    } else {
        println!("\nEnrichment requests");
        for request in requests {
            println!(
                "- session {} | signals: {}",
                request.session_id,
                request.signals.join(", ")
            );
            for (question, highlight) in &request.highlights {
                println!("    {question}: {highlight}");
            }
        }
    }

    let completed = service.completed_profiles(10)?;
    println!("\nCompleted profiles on record: {}", completed.len());
    for record in completed {
        println!(
            "- {} | confidence {}% | {} answers | completed {}",
            record.session_id,
            record.snapshot.confidence,
            record.snapshot.answers.len(),
            record.completed_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}

pub(crate) fn render_catalog_outline(outline: &CatalogOutline) {
    println!("Question catalog outline");
    println!(
        "{} questions | {} always visible | {} gated | {} with derived options",
        outline.question_count,
        outline.always_visible_count,
        outline.gated_count,
        outline.dynamic_option_count
    );

    for question in &outline.questions {
        println!("- {} ({})", question.id, question.kind_label);
        println!("  prompt: {}", question.prompt);
        println!("  visibility: {}", question.visibility);
        println!("  options: {}", question.options);
        if !question.signal_tags.is_empty() {
            println!("  signals: {}", question.signal_tags.join(", "));
        }
    }
}

fn render_state(view: &SessionStateView) {
    println!(
        "[{}] answered {}/{} | confidence {}%",
        view.status_label, view.answered, view.visible_total, view.confidence
    );
    if !view.signals.is_empty() {
        println!("  signals: {}", view.signals.join(", "));
    }

    match &view.question {
        Some(question) => {
            println!("  next: {} ({})", question.prompt, question.kind_label);
            if let Some(subtext) = question.subtext {
                println!("        {subtext}");
            }
            if let Some(disclaimer) = question.disclaimer {
                println!("        note: {disclaimer}");
            }
            if let Some(insight) = question.insight {
                println!("        insight: {insight}");
            }
            if !question.options.is_empty() {
                let values: Vec<&str> =
                    question.options.iter().map(|option| option.value).collect();
                println!("        options: {}", values.join(" | "));
            }
            if let Some(prefill) = &view.prefill {
                println!("        prefill: {}", render_value(prefill));
            }
        }
        None => println!("  interview complete"),
    }
}

fn render_value(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Scalar(text) => text.clone(),
        AnswerValue::Selections(values) => values.join(", "),
    }
}
