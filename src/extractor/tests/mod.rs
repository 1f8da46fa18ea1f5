use crate::extractor::extract_text;

#[test]
fn test_extract_article_page() {
    let html = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Sample Article - News Site</title>
    <style>body { font-family: serif; }</style>
    <script>window.analytics = {};</script>
  </head>
  <body>
    <nav>Home | About</nav>
    <article>
      <h1>Sample Article</h1>
      <p>This is the first paragraph.</p>
      <p>This is the   second
         paragraph.</p>
    </article>
    <script>document.write("ads");</script>
  </body>
</html>"#;

    let text = extract_text(html);

    assert!(text.raw_text.contains("\n"));
    assert_eq!(
        text.extracted_content,
        "Home | About Sample Article This is the first paragraph. This is the second paragraph."
    );
    assert!(!text.raw_text.contains("analytics"));
    assert!(!text.raw_text.contains("ads"));
    assert!(!text.raw_text.contains("font-family"));
}

#[test]
fn test_extract_whitespace_only_body() {
    let text = extract_text("<html><body>\n\t  \n</body></html>");
    assert_eq!(text.extracted_content, "");
}

#[test]
fn test_extract_malformed_html() {
    let text = extract_text("<div><p>Unclosed <b>bold <i>nested</div></p> trailing");
    assert!(text.extracted_content.contains("Unclosed bold nested"));
    assert!(text.extracted_content.ends_with("trailing"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::normalize_whitespace;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract_text(&html);
        }

        #[test]
        fn test_extracted_content_is_normalized(html in ".*") {
            let text = extract_text(&html);
            prop_assert_eq!(normalize_whitespace(&text.raw_text), text.extracted_content.clone());
            prop_assert!(!text.extracted_content.contains("  "));
            prop_assert_eq!(text.extracted_content.trim(), text.extracted_content.as_str());
        }
    }
}
