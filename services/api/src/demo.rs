use crate::infra::{InMemoryQuizResultRepository, PlainTextReportGenerator, TracingAnalyticsSink};
use clap::{Args, ValueEnum};
use srecno_quiz::config::AppConfig;
use srecno_quiz::error::AppError;
use srecno_quiz::quiz::{
    Answer, LeadInfo, Question, QuestionKind, QuizDefinition, QuizService, QuizServiceError,
    QuizSession, QuizState, QuizType, SCALE_MAX, SCALE_MIN,
};
use std::sync::Arc;

type DemoService =
    QuizService<InMemoryQuizResultRepository, TracingAnalyticsSink, PlainTextReportGenerator>;

pub(crate) fn parse_quiz_type(raw: &str) -> Result<QuizType, String> {
    QuizType::from_slug(raw).ok_or_else(|| {
        let known: Vec<&str> = QuizType::ALL.iter().map(|quiz| quiz.slug()).collect();
        format!("unknown quiz '{raw}' (expected one of: {})", known.join(", "))
    })
}

#[derive(Args, Debug)]
pub(crate) struct ShowQuizArgs {
    /// Quiz to print (readiness, model_fit)
    #[arg(value_parser = parse_quiz_type)]
    pub(crate) quiz: QuizType,
    /// Print the definition as JSON instead of a text outline
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoProfile {
    /// Top answer everywhere
    #[default]
    Eager,
    /// Middle-of-the-road answers
    Cautious,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Quiz to run
    #[arg(long, default_value = "readiness", value_parser = parse_quiz_type)]
    pub(crate) quiz: QuizType,
    /// Scripted answer profile
    #[arg(long, value_enum, default_value_t = DemoProfile::Eager)]
    pub(crate) profile: DemoProfile,
    /// Lead name used for the capture step
    #[arg(long, default_value = "Demo Partner")]
    pub(crate) name: String,
    /// Lead email used for the capture step
    #[arg(long, default_value = "partner@example.rs")]
    pub(crate) email: String,
    /// Optional lead phone number
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Skip the lead capture and report steps
    #[arg(long)]
    pub(crate) skip_lead: bool,
}

pub(crate) fn show_quiz(args: ShowQuizArgs) -> Result<(), AppError> {
    let service = demo_service(Default::default());
    let quiz = service.definition(args.quiz)?;

    if args.json {
        match serde_json::to_string_pretty(quiz.as_ref()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Quiz definition unavailable: {err}"),
        }
        return Ok(());
    }

    render_outline(&quiz);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let lead_scoring = AppConfig::load()?.lead_scoring;
    let service = demo_service(lead_scoring);
    let mut session = service.start_session(args.quiz)?;

    println!("{}", session.quiz().title);
    println!("{}\n", session.quiz().intro);

    while let Some(question) = session.current_question().cloned() {
        let position = session.current_index().unwrap_or_default() + 1;
        println!("[{position}/{}] {}", session.quiz().len(), question.text);
        answer_scripted(&service, &mut session, &question, args.profile)?;
    }

    let Some(outcome) = session.state().outcome().cloned() else {
        println!("Quiz did not complete");
        return Ok(());
    };

    println!(
        "\nScore {:.1} / {:.0} -> {}",
        outcome.score, outcome.max_score, outcome.result.title
    );
    println!("{}", outcome.result.description);
    for recommendation in &outcome.result.recommendations {
        println!("  - {recommendation}");
    }
    println!("{} ({})", outcome.result.cta_text, outcome.result.cta_link);

    if args.skip_lead {
        return Ok(());
    }

    let lead = LeadInfo {
        name: args.name,
        email: args.email,
        phone: args.phone,
    };
    let record = match service.capture_lead(&mut session, lead) {
        Ok(record) => record,
        Err(QuizServiceError::Lead(err)) => {
            println!("\nLead rejected:");
            for field in &err.fields {
                println!("  - {}: {}", field.field.label(), field.message);
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    println!(
        "\nStored result {} (lead score {})",
        record.record_id.0, record.lead_score
    );

    let document = service.session_report(&session)?;
    println!(
        "\nReport {} ({}):\n{}",
        document.file_name,
        document.content_type,
        String::from_utf8_lossy(&document.bytes)
    );

    Ok(())
}

fn demo_service(lead_scoring: srecno_quiz::quiz::LeadScoreConfig) -> DemoService {
    QuizService::new(
        Arc::new(InMemoryQuizResultRepository::default()),
        Arc::new(TracingAnalyticsSink),
        Arc::new(PlainTextReportGenerator),
        lead_scoring,
    )
}

fn answer_scripted(
    service: &DemoService,
    session: &mut QuizSession,
    question: &Question,
    profile: DemoProfile,
) -> Result<(), QuizServiceError> {
    let eager = profile == DemoProfile::Eager;

    match question.kind {
        QuestionKind::Scale => {
            let value = if eager { SCALE_MAX } else { (SCALE_MIN + SCALE_MAX) / 2 };
            println!("  -> {value}");
            service.record_answer(session, Answer::Scale(value))?;
        }
        QuestionKind::Boolean => {
            println!("  -> {}", if eager { "da" } else { "ne" });
            service.record_answer(session, Answer::Boolean(eager))?;
        }
        QuestionKind::MultipleChoice => {
            let index = if eager {
                question.options.len().saturating_sub(1)
            } else {
                question.options.len() / 2
            };
            if let Some(option) = question.option(index) {
                println!("  -> {}", option.text);
            }
            service.select_option(session, index)?;
        }
        QuestionKind::MultipleSelect => {
            let picks: Vec<usize> = if eager {
                (0..question.options.len()).collect()
            } else {
                vec![0]
            };
            for index in picks {
                if let Some(option) = question.option(index) {
                    println!("  -> {}", option.text);
                }
                service.select_option(session, index)?;
            }
            service.advance(session)?;
        }
    }

    if let QuizState::Completed { .. } = session.state() {
        println!("  (quiz complete)");
    }
    Ok(())
}

fn render_outline(quiz: &QuizDefinition) {
    println!("{} [{}]", quiz.title, quiz.quiz_type);
    println!("{}", quiz.intro);
    println!(
        "Score range {:.0} - {:.0}\n",
        quiz.min_possible_score(),
        quiz.max_possible_score()
    );

    for (index, question) in quiz.questions.iter().enumerate() {
        println!(
            "{}. {} ({}, weight {})",
            index + 1,
            question.text,
            question.kind.label(),
            question.weight
        );
        for option in &question.options {
            println!("     - {} = {}", option.text, option.value);
        }
    }

    println!("\nResults:");
    for bucket in &quiz.buckets {
        println!(
            "  {:>6.2} - {:>6.2}  {}",
            bucket.min_score, bucket.max_score, bucket.title
        );
    }
}
