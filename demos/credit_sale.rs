/// credit sale - plan, issue and pay down a two-installment sale
use chrono::NaiveDate;
use credit_schedule::{
    build_schedule, display_name, normalize_templates, parse_raw_templates, validate_installments,
    validate_template, Money, PaymentTrace, ScheduleRequest,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,credit_schedule=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // plan as it arrives from the configuration form
    let raw = parse_raw_templates(
        r#"[
            { "daysToDue": "60", "percentage": 50 },
            { "daysToDue": 30, "percentage": "50" }
        ]"#,
    )?;
    let templates = normalize_templates(Some(&raw));

    let problems = validate_template(&templates);
    if !problems.is_empty() {
        for problem in &problems {
            println!("template rejected: {problem}");
        }
        return Ok(());
    }
    println!("payment method: {}", display_name(&templates));

    // issue the sale
    let issue_date = NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad issue date")?;
    let request =
        ScheduleRequest::new(Money::from_major(300), issue_date).with_templates(templates);
    let schedule = build_schedule(&request);
    println!("schedule issues: {:?}", validate_installments(schedule.installments()));
    println!("{}\n", schedule.json()?);

    // first installment paid in two steps
    let paid_on = NaiveDate::from_ymd_opt(2025, 1, 20).ok_or("bad payment date")?;
    let cash = PaymentTrace::new(Money::from_major(100), paid_on).with_method("cash");
    let schedule = schedule.apply_payment(1, cash)?;
    let schedule = schedule.apply_payment(
        1,
        PaymentTrace::new(Money::from_major(50), paid_on)
            .with_method("transfer")
            .with_reference("OP-0001"),
    )?;

    let overdue = NaiveDate::from_ymd_opt(2025, 3, 10).ok_or("bad date")?;
    println!("overdue on {overdue}: {}", schedule.overdue_as_of(overdue).len());
    println!("{}", schedule.json()?);

    Ok(())
}
