//! End-to-end conversion: fragment directory in, documents out

mod common;

use common::{
    assert_document_invariants, files_with_extension, flat_fragment, noun, verb, FragmentDir, Word,
};
use regex_lite::Regex;
use sonar2naf::{convert_directory, ConverterConfig, MemorySink, NafDirectorySink, TokenId};
use std::sync::Arc;
use tempfile::TempDir;

fn interjection(word: &str) -> Word {
    Word::new(word, "tag", "TSW()")
}

async fn convert_to_memory(dir: &FragmentDir) -> (sonar2naf::BatchReport, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let report = convert_directory(dir.path(), sink.clone(), ConverterConfig::default())
        .await
        .expect("conversion failed");
    (report, sink)
}

#[tokio::test]
async fn test_two_sentences_share_a_paragraph() {
    let dir = FragmentDir::new();
    dir.write("doc1.p.1.s.1.xml", &flat_fragment(&[interjection("hello")], None));
    dir.write("doc1.p.1.s.2.xml", &flat_fragment(&[interjection("world")], None));

    let (report, sink) = convert_to_memory(&dir).await;
    assert!(report.is_success());

    let document = sink.get("doc1").unwrap();
    assert_eq!(document.raw(), "hello world");

    let tokens = document.tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].id, TokenId(1));
    assert_eq!(tokens[0].form, "hello");
    assert_eq!(tokens[0].offset, 0);
    assert_eq!(tokens[1].id, TokenId(2));
    assert_eq!(tokens[1].form, "world");
    assert_eq!(tokens[1].offset, 6);
    assert!(tokens.iter().all(|t| t.paragraph == 1));
    assert_eq!(tokens[0].sentence, 1);
    assert_eq!(tokens[1].sentence, 2);
    assert_document_invariants(&document);
}

#[tokio::test]
async fn test_head_first_then_body_in_sentence_order() {
    let dir = FragmentDir::new();
    let sentence = |word: &str| flat_fragment(&[interjection(word)], Some(word));
    dir.write_shuffled(&[
        ("WR-P-E-I-0000000012.head.1.s.1.xml", sentence("Titel")),
        ("WR-P-E-I-0000000012.p.1.s.1.xml", sentence("een")),
        ("WR-P-E-I-0000000012.p.1.s.1_1.xml", sentence("tussen")),
        ("WR-P-E-I-0000000012.p.1.s.2.xml", sentence("twee")),
        ("WR-P-E-I-0000000012.p.1.s.10.xml", sentence("tien")),
        ("WR-P-E-I-0000000012.p.2.s.1.xml", sentence("drie")),
    ]);

    let (report, sink) = convert_to_memory(&dir).await;
    assert!(report.is_success());

    let document = sink.get("WR-P-E-I-0000000012").unwrap();
    assert_eq!(document.raw(), "Titel\n\neen tussen twee tien\n\ndrie");

    let forms: Vec<&str> = document.tokens().iter().map(|t| t.form.as_str()).collect();
    assert_eq!(forms, vec!["Titel", "een", "tussen", "twee", "tien", "drie"]);
    let sentences: Vec<u32> = document.tokens().iter().map(|t| t.sentence).collect();
    assert_eq!(sentences, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(document.tokens()[5].paragraph, 2);
    assert_document_invariants(&document);
}

#[tokio::test]
async fn test_predicates_roles_and_missed_roles() {
    let dir = FragmentDir::new();
    dir.write(
        "doc.p.1.s.1.xml",
        &flat_fragment(
            &[
                noun("Jan").rel("su").pb("Arg0"),
                verb("ziet").rel("hd").pb("rel"),
                noun("Marie").rel("obj1").pb("Arg1"),
            ],
            Some("Jan ziet Marie"),
        ),
    );
    dir.write(
        "doc.p.1.s.2.xml",
        &flat_fragment(
            &[noun("Marie").rel("su").pb("Arg0"), verb("lacht").rel("hd")],
            Some("Marie lacht"),
        ),
    );

    let (report, sink) = convert_to_memory(&dir).await;
    assert!(report.is_success());
    assert_eq!(report.missed_roles, 1);

    let document = sink.get("doc").unwrap();
    let stats = document.stats();
    assert_eq!(stats.predicates, 1);
    assert_eq!(stats.roles, 2);
    assert_eq!(stats.missed_roles, 1);

    let predicate = &document.predicates()[0];
    assert_eq!(predicate.id.to_string(), "pr1");
    assert_eq!(predicate.span, vec![TokenId(2)]);
    assert_eq!(predicate.head, Some(TokenId(2)));

    let roles: Vec<(String, &str, Vec<TokenId>)> = predicate
        .roles
        .iter()
        .map(|r| (r.id.to_string(), r.label.as_str(), r.span.clone()))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("rl1".to_string(), "Arg0", vec![TokenId(1)]),
            ("rl2".to_string(), "Arg1", vec![TokenId(3)]),
        ]
    );
    assert_eq!(document.raw(), "Jan ziet Marie Marie lacht");
    assert_document_invariants(&document);
}

#[tokio::test]
async fn test_counters_restart_per_document() {
    let dir = FragmentDir::new();
    for doc in ["a", "b"] {
        dir.write(
            &format!("{}.p.1.s.1.xml", doc),
            &flat_fragment(
                &[noun("Piet").pb("Arg0"), verb("slaapt").rel("hd").pb("rel")],
                None,
            ),
        );
    }

    let (report, sink) = convert_to_memory(&dir).await;
    assert_eq!(report.converted.len(), 2);
    for name in ["a", "b"] {
        let document = sink.get(name).unwrap();
        assert_eq!(document.tokens()[0].id, TokenId(1));
        assert_eq!(document.predicates()[0].id.to_string(), "pr1");
        assert_eq!(document.predicates()[0].roles[0].id.to_string(), "rl1");
    }
}

#[tokio::test]
async fn test_broken_document_is_excluded_from_output() {
    let input = FragmentDir::new();
    let output = TempDir::new().unwrap();
    input.write(
        "good.p.1.s.1.xml",
        &flat_fragment(&[noun("Amsterdam"), verb("bruist")], Some("Amsterdam bruist")),
    );
    // Two terminals claiming the same position
    let broken = input.write(
        "broken.p.1.s.1.xml",
        r#"<alpino_ds><node rel="top"><node begin="0" rel="--" word="a" lemma="a" pos="noun" postag="N()"/><node begin="0" rel="--" word="b" lemma="b" pos="noun" postag="N()"/></node></alpino_ds>"#,
    );

    let config = ConverterConfig::default();
    let sink = Arc::new(NafDirectorySink::new(output.path(), &config).unwrap());
    let report = convert_directory(input.path(), sink, config).await.unwrap();

    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "broken");
    assert_eq!(report.failed[0].fragment.as_deref(), Some(broken.as_path()));

    let written = files_with_extension(output.path(), "naf");
    assert_eq!(written, vec![output.path().join("good.naf")]);

    let naf = std::fs::read_to_string(&written[0]).unwrap();
    let wf = Regex::new(r#"<wf id="(w\d+)" offset="(\d+)" length="(\d+)""#).unwrap();
    let spans: Vec<(String, usize, usize)> = wf
        .captures_iter(&naf)
        .map(|c| (c[1].to_string(), c[2].parse().unwrap(), c[3].parse().unwrap()))
        .collect();
    assert_eq!(
        spans,
        vec![("w1".to_string(), 0, 9), ("w2".to_string(), 10, 6)]
    );
    assert!(naf.contains("<raw>Amsterdam bruist</raw>"));
}

#[tokio::test]
async fn test_offsets_count_characters() {
    let dir = FragmentDir::new();
    dir.write(
        "doc.p.1.s.1.xml",
        &flat_fragment(&[noun("Café"), noun("Zürich")], Some("Café Zürich")),
    );

    let (_, sink) = convert_to_memory(&dir).await;
    let document = sink.get("doc").unwrap();
    let tokens = document.tokens();
    assert_eq!((tokens[0].offset, tokens[0].length), (0, 4));
    assert_eq!((tokens[1].offset, tokens[1].length), (5, 6));
    assert_document_invariants(&document);
}
