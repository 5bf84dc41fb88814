//! End-to-end pipeline tests for resume2site.
//!
//! Most tests drive the whole pipeline with a scripted completion backend,
//! so they run offline and deterministically. Resume fixtures are built in
//! memory: DOCX with `docx-rs`, PDF with `lopdf`.
//!
//! The live test at the bottom calls the real provider and is gated behind
//! `E2E_ENABLED` (plus `GEMINI_API_KEY`) so it never runs in CI by accident.
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use resume2site::{
    build_prompt, generate, generate_from_bytes, generate_to_dir, inspect, Completion,
    CompletionBackend, ErrorKind, GenerationConfig, GenerationProgressCallback, ParseError,
    SegmentKind, Session, SiteGenError, Stage, UploadedDocument, ARCHIVE_FILE_NAME,
    PREVIEW_FILE_NAME,
};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const GOOD_COMPLETION: &str = "--html--\n<html><body>Hi</body></html>\n--html--\n\n--css--\nbody{color:red;}\n--css--\n\n--js--\nconsole.log(1);\n--js--";

const NO_JS_CLOSE: &str = "--html--\n<html><body>Hi</body></html>\n--html--\n\n--css--\nbody{color:red;}\n--css--\n\n--js--\nconsole.log(1);\n";

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Backend that answers every prompt with a fixed completion and records
/// what it was asked.
struct Scripted {
    answer: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl Scripted {
    fn ok(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for Scripted {
    async fn complete(&self, prompt: &str) -> Result<Completion, SiteGenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.answer {
            Ok(text) => Ok(Completion {
                content: text.clone(),
                prompt_tokens: 120,
                completion_tokens: 80,
            }),
            Err(message) => Err(SiteGenError::GenerationFailed {
                message: message.clone(),
            }),
        }
    }
}

fn config_with(backend: Arc<Scripted>) -> GenerationConfig {
    GenerationConfig::builder()
        .backend(backend as Arc<dyn CompletionBackend>)
        .build()
        .expect("valid config")
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for p in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
    }
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).expect("pack docx");
    cursor.into_inner()
}

/// A PDF with one page per entry; `None` makes a page with no text at all.
fn pdf_bytes(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut f = archive.by_index(i).expect("entry");
            let mut s = String::new();
            f.read_to_string(&mut s).expect("utf-8 entry");
            (f.name().to_string(), s)
        })
        .collect()
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_pages_are_concatenated_in_order() {
    let bytes = pdf_bytes(&[Some("Alpha Page"), None, Some("Bravo Page")]);
    let doc = UploadedDocument::from_bytes("cv.pdf", bytes).unwrap();
    let text = resume2site::extract(&doc).await.expect("pdf should extract");

    // Each text page starts with pdf-extract's page break; the empty page adds nothing.
    assert_eq!(text, "\n\nAlpha Page\n\nBravo Page");
}

#[tokio::test]
async fn docx_paragraphs_are_concatenated_in_order() {
    let doc = UploadedDocument::from_bytes("cv.docx", docx_bytes(&["One", "Two", "Three"]))
        .unwrap();
    let text = resume2site::extract(&doc).await;
    assert_eq!(text.as_deref(), Some("One\nTwo\nThree\n"));
}

#[tokio::test]
async fn inspect_reads_a_docx_file_without_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Jane.DOCX");
    std::fs::write(&path, docx_bytes(&["Jane Doe", "Rustacean"])).unwrap();
    let text = inspect(path.to_str().unwrap(), 5).await.unwrap();
    assert_eq!(text, "Jane Doe\nRustacean\n");
}

// ── Full pipeline ────────────────────────────────────────────────────────────

#[tokio::test]
async fn sample_completion_produces_exact_archive() {
    let backend = Scripted::ok(GOOD_COMPLETION);
    let config = config_with(backend.clone());

    let site = generate_from_bytes("cv.docx", docx_bytes(&["Jane Doe"]), &config)
        .await
        .expect("generation should succeed");

    assert_eq!(
        zip_entries(&site.archive),
        vec![
            ("index.html".to_string(), "<html><body>Hi</body></html>".to_string()),
            ("style.css".to_string(), "body{color:red;}".to_string()),
            ("script.js".to_string(), "console.log(1);".to_string()),
        ]
    );
    assert!(site.preview.contains("<style>body{color:red;}</style>"));
    assert!(site.preview.contains("<script>console.log(1);</script>"));
    assert_eq!(site.stats.prompt_tokens, 120);
    assert_eq!(site.stats.completion_tokens, 80);
    assert_eq!(site.stats.archive_bytes, site.archive.len());
    let stats = &site.stats;
    assert!(
        stats.total_duration_ms
            >= stats.extract_duration_ms
                + stats.llm_duration_ms
                + stats.parse_duration_ms
                + stats.package_duration_ms
    );
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn prompt_carries_resume_text_verbatim() {
    let backend = Scripted::ok(GOOD_COMPLETION);
    let config = config_with(backend.clone());
    generate_from_bytes("cv.docx", docx_bytes(&["Jane {Doe} --css--"]), &config)
        .await
        .unwrap();

    let prompt = backend.last_prompt.lock().unwrap().clone().unwrap();
    assert_eq!(prompt, build_prompt("Jane {Doe} --css--\n"));
}

#[tokio::test]
async fn generate_reads_pdf_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.pdf");
    std::fs::write(&path, pdf_bytes(&[Some("Jane Doe Engineer")])).unwrap();

    let backend = Scripted::ok(GOOD_COMPLETION);
    let site = generate(path.to_str().unwrap(), &config_with(backend.clone()))
        .await
        .unwrap();
    assert_eq!(site.segments.js, "console.log(1);");
    let prompt = backend.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Jane Doe Engineer"));
}

#[tokio::test]
async fn generate_to_dir_writes_archive_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cv.docx");
    std::fs::write(&input, docx_bytes(&["Jane"])).unwrap();
    let out = dir.path().join("site");

    let site = generate_to_dir(
        input.to_str().unwrap(),
        &out,
        &config_with(Scripted::ok(GOOD_COMPLETION)),
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(out.join(ARCHIVE_FILE_NAME)).unwrap(), site.archive);
    assert_eq!(
        std::fs::read_to_string(out.join(PREVIEW_FILE_NAME)).unwrap(),
        site.preview
    );
}

// ── Failure policy ───────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_js_closing_marker_is_a_parsing_failure() {
    let backend = Scripted::ok(NO_JS_CLOSE);
    let err = generate_from_bytes("cv.docx", docx_bytes(&["Jane"]), &config_with(backend))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parsing);
    match err {
        SiteGenError::Parse(ParseError::MissingClosing(kind)) => {
            assert_eq!(kind, SegmentKind::Script)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn extraction_failure_never_reaches_the_model() {
    let backend = Scripted::ok(GOOD_COMPLETION);
    let err = generate_from_bytes(
        "cv.pdf",
        b"%PDF-1.4\nthis is not a real pdf".to_vec(),
        &config_with(backend.clone()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn empty_document_never_reaches_the_model() {
    let backend = Scripted::ok(GOOD_COMPLETION);
    let err = generate_from_bytes("cv.pdf", pdf_bytes(&[None]), &config_with(backend.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, SiteGenError::EmptyDocument { .. }), "got {err:?}");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn unsupported_format_is_rejected_before_extraction() {
    let backend = Scripted::ok(GOOD_COMPLETION);
    let err = generate_from_bytes("cv.doc", vec![0xD0, 0xCF, 0x11, 0xE0], &config_with(backend.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, SiteGenError::UnsupportedFormat { .. }));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn provider_errors_collapse_into_one_generation_failure() {
    for message in ["401 invalid api key", "429 quota exceeded", "connection reset"] {
        let err = generate_from_bytes(
            "cv.docx",
            docx_bytes(&["Jane"]),
            &config_with(Scripted::failing(message)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert!(err.to_string().contains(message));
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_keeps_previous_result_when_regeneration_fails() {
    let mut session = Session::new();
    let doc = || UploadedDocument::from_bytes("cv.docx", docx_bytes(&["Jane"])).unwrap();

    session
        .generate_from_document(doc(), &config_with(Scripted::ok(GOOD_COMPLETION)))
        .await
        .unwrap();
    let first_archive = session.archive().unwrap().to_vec();
    let first_preview = session.preview().unwrap().to_string();

    let err = session
        .generate_from_document(doc(), &config_with(Scripted::ok(NO_JS_CLOSE)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parsing);

    assert_eq!(session.archive().unwrap(), first_archive.as_slice());
    assert_eq!(session.preview().unwrap(), first_preview);
}

#[tokio::test]
async fn session_replaces_result_wholesale_on_success() {
    let mut session = Session::new();
    let doc = || UploadedDocument::from_bytes("cv.docx", docx_bytes(&["Jane"])).unwrap();

    session
        .generate_from_document(doc(), &config_with(Scripted::ok(GOOD_COMPLETION)))
        .await
        .unwrap();

    let second = "--html--\n<main>New</main>\n--html--\n--css--\nmain{}\n--css--\n--js--\nrun();\n--js--";
    let result = session
        .generate_from_document(doc(), &config_with(Scripted::ok(second)))
        .await
        .unwrap();
    assert_eq!(result.segments.html, "<main>New</main>");

    let entries = zip_entries(session.archive().unwrap());
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].1, "<main>New</main>");
    assert_eq!(entries[2].1, "run();");
}

#[tokio::test]
async fn independent_sessions_do_not_share_results() {
    let mut a = Session::new();
    let b = Session::new();
    a.generate_from_document(
        UploadedDocument::from_bytes("cv.docx", docx_bytes(&["Jane"])).unwrap(),
        &config_with(Scripted::ok(GOOD_COMPLETION)),
    )
    .await
    .unwrap();
    assert!(a.result().is_some());
    assert!(b.result().is_none());
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Events(Mutex<Vec<String>>);

impl GenerationProgressCallback for Events {
    fn on_stage_start(&self, stage: Stage) {
        self.0.lock().unwrap().push(format!("start:{stage:?}"));
    }
    fn on_stage_complete(&self, stage: Stage, _elapsed_ms: u64) {
        self.0.lock().unwrap().push(format!("done:{stage:?}"));
    }
    fn on_stage_error(&self, stage: Stage, _error: String) {
        self.0.lock().unwrap().push(format!("error:{stage:?}"));
    }
}

#[tokio::test]
async fn progress_reports_each_stage_in_order() {
    let events = Arc::new(Events::default());
    let config = GenerationConfig::builder()
        .backend(Scripted::ok(GOOD_COMPLETION) as Arc<dyn CompletionBackend>)
        .progress_callback(events.clone())
        .build()
        .unwrap();

    generate_from_bytes("cv.docx", docx_bytes(&["Jane"]), &config)
        .await
        .unwrap();

    let log = events.0.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            "start:Extract",
            "done:Extract",
            "start:Generate",
            "done:Generate",
            "start:Parse",
            "done:Parse",
            "start:Package",
            "done:Package",
        ]
    );
}

#[tokio::test]
async fn progress_stops_at_failing_stage() {
    let events = Arc::new(Events::default());
    let config = GenerationConfig::builder()
        .backend(Scripted::ok(NO_JS_CLOSE) as Arc<dyn CompletionBackend>)
        .progress_callback(events.clone())
        .build()
        .unwrap();

    let _ = generate_from_bytes("cv.docx", docx_bytes(&["Jane"]), &config).await;

    let log = events.0.lock().unwrap().clone();
    assert_eq!(log.last().map(String::as_str), Some("error:Parse"));
    assert!(!log.iter().any(|e| e.contains("Package")));
}

// ── Live provider (opt-in) ───────────────────────────────────────────────────

#[tokio::test]
async fn live_generation_from_docx() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP: set E2E_ENABLED=1 to run live tests");
        return;
    }
    if std::env::var("GEMINI_API_KEY").is_err() {
        println!("SKIP: GEMINI_API_KEY not set");
        return;
    }

    let resume = docx_bytes(&[
        "Jane Doe",
        "Senior Rust Engineer",
        "Email: jane@example.com | Phone: +1 555 0100",
        "Skills: Rust, Tokio, PostgreSQL, Kubernetes",
        "Projects: resume2site — turns resumes into websites",
    ]);
    let site = generate_from_bytes("jane.docx", resume, &GenerationConfig::default())
        .await
        .expect("live generation should succeed");

    let entries = zip_entries(&site.archive);
    assert_eq!(entries.len(), 3);
    assert!(!site.segments.html.contains("<form"), "contact form should be omitted");
    println!(
        "✓ live site: {} byte archive, {} tokens out",
        site.archive.len(),
        site.stats.completion_tokens
    );
}
