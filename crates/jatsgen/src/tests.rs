use lopdf::{
  content::{Content, Operation},
  dictionary, Document, Object, Stream,
};

use super::*;
use crate::{
  conversion::{ConversionState, Converter, RawInputs},
  history::{History, HistorySource, NotFoundReason},
};

/// A complete source record.
pub(crate) const SOURCE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ArticleSet>
  <Article>
    <Journal>
      <PublisherName>MMU Press</PublisherName>
      <JournalTitle>Journal of Informatics and Web Engineering</JournalTitle>
      <Issn>2821-370X</Issn>
      <Volume>3</Volume>
      <Issue>2</Issue>
      <PubDate PubStatus="epublish">
        <Year>2024</Year>
        <Month>06</Month>
        <Day>14</Day>
      </PubDate>
      <PubDate PubStatus="pub">
        <Year>2024</Year>
      </PubDate>
    </Journal>
    <ArticleTitle>Graph Methods for Web Archives</ArticleTitle>
    <FirstPage>12</FirstPage>
    <LastPage>27</LastPage>
    <ELocationID EIdType="doi">10.33093/jiwe.2024.3.2.5</ELocationID>
    <AuthorList>
      <Author><FirstName>Aisha</FirstName><LastName>Rahman</LastName></Author>
      <Author><FirstName>Wei</FirstName><LastName>Tan</LastName></Author>
    </AuthorList>
    <Abstract>We study graphs &amp; archives.</Abstract>
  </Article>
</ArticleSet>
"#;

const ARTICLE_PAGE: &str = r#"<html><head>
  <meta name="citation_keywords" content="graphs; web archives">
</head><body>
  <div class="list-group-item date-published"><strong>Published:</strong> 14 June 2024</div>
</body></html>"#;

const TEMPLATE: &str = "<article>\n<front>TBD</front>\n<body>\n  <sec>Intro</sec>\n</body>\n</article>\n";

/// A one-page PDF showing `line` in a standard font.
pub(crate) fn pdf_with_text(line: &str) -> Vec<u8> {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Courier",
  });
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => font_id },
  });
  let content = Content {
    operations: vec![
      Operation::new("BT", vec![]),
      Operation::new("Tf", vec!["F1".into(), 10.into()]),
      Operation::new("Td", vec![50.into(), 700.into()]),
      Operation::new("Tj", vec![Object::string_literal(line)]),
      Operation::new("ET", vec![]),
    ],
  };
  let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
  let page_id = doc.add_object(dictionary! {
    "Type" => "Page",
    "Parent" => pages_id,
    "Contents" => content_id,
    "Resources" => resources_id,
  });
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => vec![page_id.into()],
      "Count" => 1,
      "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);

  let mut bytes = Vec::new();
  doc.save_to(&mut bytes).unwrap();
  bytes
}

fn inputs(pdf: Vec<u8>, article_url: String) -> RawInputs {
  RawInputs {
    pdf,
    xml: SOURCE_XML.to_string(),
    article_url,
    pdf_link: Some("https://journals.example.org/article/download/1234/900".to_string()),
  }
}

#[traced_test]
#[tokio::test]
async fn test_complete_conversion() -> anyhow::Result<()> {
  let mut server = mockito::Server::new_async().await;
  let _page = server
    .mock("GET", "/index.php/jiwe/article/view/1234")
    .with_status(200)
    .with_body(ARTICLE_PAGE)
    .create_async()
    .await;
  let url = format!("{}/index.php/jiwe/article/view/1234", server.url());
  let pdf = pdf_with_text("Received: 1 January 2024; Accepted: 2 March 2024");

  let ConversionState::Complete(document) = Converter::new().convert(inputs(pdf, url)).await? else {
    panic!("history should have been found in the PDF");
  };

  assert_eq!(document.filename(), "5_1234_Vol.3_No.2_2024.xml");
  assert_eq!(document.combined_filename(), "combined_5_1234_Vol.3_No.2_2024.xml");
  assert_eq!(document.report().history_source, HistorySource::Pdf);
  assert_eq!(document.report().article_id, "jJIWE.v3.i2.pg12");
  assert!(document.report().warnings.is_empty());

  let xml = document.xml();
  assert!(xml.starts_with(
    "<Article>\n  <Journal-meta>\n    <journal-id journal-id-type=\"pmc\">jiwe</journal-id>\n"
  ));
  assert!(xml.contains(
    "<PubDate PubStatus=\"received\">\n        <Year>2024</Year>\n        <Month>01</Month>\n        \
     <Day>01</Day>\n      </PubDate>"
  ));
  assert!(xml.contains("<Keyword>\n        <italic>web archives</italic>\n      </Keyword>"));
  assert!(xml.contains("<PageCount>16</PageCount>"));
  assert!(xml.ends_with("<Language>eng</Language>\n  </article-meta>\n</Article>"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_manual_history_after_degraded_steps() -> anyhow::Result<()> {
  let url = "http://127.0.0.1:9/index.php/jiwe/article/view/77".to_string();
  let state = Converter::new().convert(inputs(b"not a pdf".to_vec(), url)).await?;

  let ConversionState::AwaitingHistory(pending) = state else {
    panic!("an unreadable PDF cannot yield a history");
  };
  assert!(matches!(pending.reason(), NotFoundReason::Unreadable(_)));

  let document = pending.resume(History::from_text("3 May 2024", "Jun 1, 2024"));
  assert_eq!(document.filename(), "5_77_Vol.3_No.2_2024.xml");
  assert_eq!(document.report().history_source, HistorySource::Manual);
  assert_eq!(document.report().warnings.len(), 2);
  assert!(document.xml().contains("<Keywords />"));
  assert!(document.xml().contains("<PubDate PubStatus=\"pub\">\n      <Year>null</Year>"));
  assert!(document.report().to_json()?.contains("\"history_source\": \"manual\""));
  assert!(logs_contain("Could not read article webpage"));
  Ok(())
}

#[tokio::test]
async fn test_structural_failure_stops_conversion() {
  let inputs = RawInputs {
    pdf:         Vec::new(),
    xml:         "<ArticleSet><Article><ArticleTitle>T</ArticleTitle></Article></ArticleSet>".into(),
    article_url: "http://127.0.0.1:9/".into(),
    pdf_link:    None,
  };
  let result = Converter::new().convert(inputs).await;
  assert!(matches!(result, Err(JatsError::MissingElement("Journal"))));
  assert!(result.unwrap_err().is_structural());
}

#[tokio::test]
async fn test_output_is_stable() -> anyhow::Result<()> {
  let url = "http://127.0.0.1:9/view/77".to_string();
  let ConversionState::AwaitingHistory(pending) =
    Converter::new().convert(inputs(Vec::new(), url)).await?
  else {
    panic!("an empty PDF cannot yield a history");
  };
  let document = pending.resume(History::from_text("3 May 2024", "1 June 2024"));

  let mut reprinted = document.root().clone();
  pretty::indent(&mut reprinted);
  assert_eq!(reprinted.to_xml(), document.xml());

  let reparsed = Element::parse(document.xml())?;
  assert_eq!(reparsed.to_xml(), document.xml());

  let once = document.splice_into(TEMPLATE)?;
  let twice = splice::splice(document.xml(), &once)?;
  assert_eq!(once, twice);
  assert!(once.starts_with("<article>\n<front>\n  <Article>\n    <Journal-meta>\n"));
  assert!(once.ends_with("</front>\n<body>\n  <sec>Intro</sec>\n</body>\n</article>\n"));
  Ok(())
}
