use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use sheetgrade::{
    BoundingBox, ConfusionTable, Grader, Token, equivalent, evaluate, grade,
    grade::{GradeEvent, NullObserver},
};

fn tokens(texts: &[&str]) -> Vec<Token> {
    texts.iter().copied().map(Token::from).collect()
}

fn quiet_grader() -> Grader {
    Grader::builder().observer(Arc::new(NullObserver)).build()
}

#[test]
fn worksheet_scores_two_of_three() {
    let report = grade(&tokens(&["2+2=4", "5-3=1", "6/2=3"]));

    assert_eq!(report.total_gradable(), 3);
    assert_eq!(report.total_correct(), 2);
    assert_eq!(report.score_percent(), 66);

    let wrong = &report.verdicts()[1];
    assert_eq!(wrong.question(), "5-3");
    assert_eq!(wrong.claim(), "1");
    assert_eq!(wrong.expected().to_string(), "2");
    assert!(!wrong.is_correct());
}

#[test]
fn empty_page_scores_zero() {
    let report = grade(&[]);
    assert_eq!(report.score_percent(), 0);
    assert_eq!(report.total_gradable(), 0);
    assert!(report.verdicts().is_empty());
}

#[test]
fn skip_policy() {
    let grader = quiet_grader();

    let report = grader.grade(&tokens(&["hello world"]));
    assert_eq!(report.total_gradable(), 0);

    let report = grader.grade(&tokens(&["3+3="]));
    assert_eq!(report.total_gradable(), 0);

    let report = grader.grade(&tokens(&["3+3=xyz"]));
    assert_eq!(report.total_gradable(), 1);
    assert_eq!(report.total_correct(), 0);
    assert_eq!(report.verdicts()[0].student_claim(), None);

    // A question that does not evaluate is left out of the denominator.
    let report = grader.grade(&tokens(&["1/0=5", "2*(3=6", "4*2=8"]));
    assert_eq!(report.total_gradable(), 1);
    assert_eq!(report.score_percent(), 100);

    // Digits without `=` are not equations.
    let report = grader.grade(&tokens(&["Page 2", "12+7"]));
    assert_eq!(report.total_gradable(), 0);
}

#[test]
fn repairs_recognition_confusions() {
    let report = quiet_grader().grade(&tokens(&["2t2=4", "lO - s = S", "I | = 11"]));
    assert_eq!(report.total_gradable(), 3);
    assert_eq!(report.total_correct(), 3);
    assert_eq!(report.verdicts()[0].question(), "2+2");
    assert_eq!(report.verdicts()[1].question(), "10-5");
}

#[test]
fn equivalent_forms_are_correct() {
    let page = tokens(&["6/4 = 1.5", "1/2 + 1/4 = 3/4", "2^3 = 4*2", "7/2=3"]);
    let report = quiet_grader().grade(&page);
    assert_eq!(report.total_correct(), 3);
    assert_eq!(report.score_percent(), 75);
    assert_eq!(report.verdicts()[3].expected().to_string(), "7/2");
}

#[test]
fn trailing_delimiters_stay_in_the_claim() {
    let report = quiet_grader().grade(&tokens(&["2+2=4=4"]));
    assert_eq!(report.total_gradable(), 1);
    assert_eq!(report.verdicts()[0].claim(), "4=4");
    assert!(!report.verdicts()[0].is_correct());
}

#[test]
fn verdicts_keep_bounding_boxes() {
    let token = Token::builder()
        .raw_text("9-4=5")
        .bounding_box(BoundingBox::new(10, 20, 30, 40))
        .confidence(93.0)
        .build();
    let report = quiet_grader().grade(&[token]);
    assert_eq!(report.verdicts()[0].bounding_box(), BoundingBox::new(10, 20, 30, 40));
}

#[test]
fn custom_confusion_table() {
    let grader = Grader::builder()
        .confusions(ConfusionTable::default().with('x', '*'))
        .observer(Arc::new(NullObserver))
        .build();
    let report = grader.grade(&tokens(&["3x4=12"]));
    assert_eq!(report.total_correct(), 1);
}

#[test]
fn observer_sees_every_token() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let grader = Grader::builder()
        .observer(Arc::new(move |event: &GradeEvent<'_>| {
            let label = match event {
                GradeEvent::Rejected { index, .. } => format!("{index}:rejected"),
                GradeEvent::Unanswered { index, .. } => format!("{index}:unanswered"),
                GradeEvent::UnparseableQuestion { index, .. } => format!("{index}:skipped"),
                GradeEvent::Graded {
                    index, claim_error, ..
                } => format!("{index}:graded:{}", claim_error.is_some()),
            };
            sink.lock().expect("observer lock").push(label);
        }))
        .build();

    grader.grade(&tokens(&["Name", "3+3=", "(=2", "1+1=2", "1+1=?"]));

    assert_eq!(
        *seen.lock().expect("observer lock"),
        ["0:rejected", "1:unanswered", "2:skipped", "3:graded:false", "4:graded:true"]
    );
}

#[test]
fn concurrent_grading_matches_sequential() {
    let page: Vec<Token> = (0..200)
        .map(|i| Token::from(format!("{i}*2={}", if i % 3 == 0 { i } else { i * 2 }).as_str()))
        .collect();
    let grader = quiet_grader();

    let sequential = grader.grade(&page);
    let concurrent = grader.grade_concurrently(&page);

    assert_eq!(sequential, concurrent);
    assert_eq!(sequential.total_gradable(), 200);
    // 0*2=0 is right even though it falls in the "wrong" bucket.
    assert_eq!(sequential.total_correct(), 200 - 66);
}

#[test]
fn hostile_tokens_never_abort_the_page() {
    let page = vec![
        Token::from(format!("{}=10000", vec!["1"; 10_000].join("+")).as_str()),
        Token::from(format!("{}1=1", "-".repeat(10_000)).as_str()),
        Token::from(format!("{}2=2", "(".repeat(30)).as_str()),
        Token::from(format!("{}1{}=1", "(".repeat(500), ")".repeat(500)).as_str()),
        Token::from(format!("2+2={}", "9".repeat(50_000)).as_str()),
        Token::from(format!("{}3{}=3", "(".repeat(60), ")".repeat(60)).as_str()),
        Token::from("1+1=2"),
    ];
    let grader = quiet_grader();

    let started = Instant::now();
    let report = grader.grade(&page);
    assert!(started.elapsed() < Duration::from_secs(5));

    // Oversized questions are skipped; an oversized claim is simply wrong.
    assert_eq!(report.total_gradable(), 3);
    assert_eq!(report.total_correct(), 2);
    assert!(!report.verdicts()[0].is_correct());
    assert_eq!(report.verdicts()[0].student_claim(), None);
    assert_eq!(grader.grade_concurrently(&page), report);
}

#[test]
fn equivalence_properties() {
    assert!(equivalent(&evaluate("4/2").expect("parseable"), "2"));
    assert!(!equivalent(&evaluate("2+2").expect("parseable"), "5"));

    for e in ["4/2", "3/9", "-0.75", "2^-2"] {
        let value = evaluate(e).expect("parseable");
        assert_eq!(evaluate(&value.to_string()).expect("canonical"), value);
    }
}
