use crate::infra::{InMemoryProfileDirectory, InMemorySubmissionStore};
use clap::Args;
use dpo_vendor::auth::{AuthUser, Identity, Role};
use dpo_vendor::compliance::{
    compliance_sections, section_summaries, ComplianceIntakeService, Navigation, SessionId,
    SessionSnapshot,
};
use dpo_vendor::error::AppError;
use dpo_vendor::wizard::{ActionOutcome, FieldEdit, FieldKind, Notice, StepMarker};
use serde_json::Value;
use std::sync::Arc;

const DEMO_VENDOR_ID: &str = "demo-vendor";
const DEMO_ADMIN_ID: &str = "demo-admin";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Company name recorded on the vendor profile
    #[arg(long, default_value = "Acme Processing Ltd")]
    pub(crate) company: String,
    /// Contact email recorded on the vendor profile
    #[arg(long, default_value = "privacy@acme.test")]
    pub(crate) email: String,
    /// Service or product under assessment
    #[arg(long, default_value = "Managed payroll")]
    pub(crate) service: String,
    /// Save a draft after this many steps (1-based, must be before the last step)
    #[arg(long, default_value_t = 6)]
    pub(crate) save_after: usize,
    /// Skip the admin CSV export at the end of the demo
    #[arg(long)]
    pub(crate) skip_export: bool,
}

type DemoService = ComplianceIntakeService<InMemorySubmissionStore, InMemoryProfileDirectory>;

pub(crate) fn print_sections() {
    println!("Compliance intake sections");
    for summary in section_summaries(&compliance_sections()) {
        println!("{:>2}. {} [{}]", summary.number, summary.title, summary.id);
        println!("    {}", summary.description);
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        email,
        service,
        save_after,
        skip_export,
    } = args;

    let profiles = InMemoryProfileDirectory::default();
    profiles.upsert(Identity {
        role: Role::Superadmin,
        ..Identity::vendor(DEMO_ADMIN_ID, "dpo@dpovendor.test")
    });
    profiles.upsert(Identity {
        company: Some(company.clone()),
        ..Identity::vendor(DEMO_VENDOR_ID, email.clone())
    });

    let store = Arc::new(InMemorySubmissionStore::default());
    let intake: DemoService =
        ComplianceIntakeService::new(compliance_sections(), store.clone(), Arc::new(profiles));

    let landing = intake.landing(DEMO_VENDOR_ID, Some(&email)).await;
    println!("Vendor compliance intake demo");
    println!(
        "Signed in as {} ({}) -> {}",
        company,
        landing.role.label(),
        landing.redirect_to
    );

    let opened = intake.open_session(Some(AuthUser::new(DEMO_VENDOR_ID, email.clone())))?;
    let session_id = opened.session_id.clone();
    let mut snapshot = opened;

    loop {
        render_step(&snapshot);
        for (field, value) in sample_answers(&snapshot, &email, &company, &service) {
            snapshot = intake.edit(&session_id, FieldEdit::new(field, value))?;
        }

        if snapshot.wizard.step == save_after && snapshot.wizard.can_save {
            let outcome = intake.save(&session_id).await?;
            print_notice(outcome.notice());
        }

        if !snapshot.wizard.can_advance {
            break;
        }
        snapshot = intake.navigate(&session_id, Navigation::Advance)?;
    }

    print_navigator(&intake.snapshot(&session_id)?);
    submit(&intake, &session_id).await?;
    println!("Drafts held in store: {}", store.draft_count());

    if !skip_export {
        let csv = intake.export_csv(Some(DEMO_ADMIN_ID)).await?;
        println!("\nAdmin CSV export");
        print!("{csv}");
    }

    Ok(())
}

async fn submit(intake: &DemoService, session_id: &SessionId) -> Result<(), AppError> {
    match intake.submit(session_id).await? {
        ActionOutcome::Completed { value, notice } => {
            print_notice(&notice);
            println!(
                "Submission {} recorded as {} -> {}",
                value.receipt.submission_id,
                value.receipt.status.label(),
                value.redirect_to
            );
        }
        ActionOutcome::Failed { notice, .. } => print_notice(&notice),
    }
    Ok(())
}

fn render_step(snapshot: &SessionSnapshot) {
    let view = &snapshot.wizard;
    println!(
        "\nStep {} of {} ({}%): {}",
        view.step, view.total_steps, view.progress_percent, view.title
    );
    println!("  {}", view.description);
}

fn print_notice(notice: &Notice) {
    println!("  [{}] {}", notice.title, notice.description);
}

fn print_navigator(snapshot: &SessionSnapshot) {
    println!("\nSection overview");
    let line: Vec<String> = snapshot
        .wizard
        .navigator
        .iter()
        .map(|entry| {
            let mark = match entry.marker {
                StepMarker::Passed => "x",
                StepMarker::Current => ">",
                StepMarker::Upcoming => " ",
            };
            format!("[{mark}] {} {}", entry.number, entry.label)
        })
        .collect();
    println!("  {}", line.join("  "));
}

/// Fill every rendered field that is still empty with a plausible answer.
fn sample_answers(
    snapshot: &SessionSnapshot,
    email: &str,
    company: &str,
    service: &str,
) -> Vec<(String, Value)> {
    snapshot
        .wizard
        .render
        .fields
        .iter()
        .filter(|field| field.value.is_null())
        .map(|field| {
            let value = match field.key.as_str() {
                "email" | "contact_email" => Value::from(email),
                "vendor_name" => Value::from(company),
                "service_name" => Value::from(service),
                _ => sample_value(&field.kind),
            };
            (field.key.clone(), value)
        })
        .collect()
}

fn sample_value(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::YesNo => Value::from("yes"),
        FieldKind::Choice { options } => options
            .first()
            .map(|option| Value::from(option.as_str()))
            .unwrap_or(Value::Null),
        FieldKind::Date => Value::from("2025-10-01"),
        FieldKind::Email => Value::from("contact@vendor.test"),
        FieldKind::Text | FieldKind::LongText => Value::from("Documented in vendor pack"),
    }
}
