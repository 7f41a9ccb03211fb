// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 内置关键词列表的分类测试

#[cfg(test)]
mod tests {
    use keyword_scout::domain::models::keyword_set::DEFAULT_KEYWORDS;
    use keyword_scout::domain::models::{KeywordSet, Verdict};
    use keyword_scout::domain::services::KeywordClassifier;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(KeywordSet::default_set().unwrap())
    }

    #[test]
    fn test_default_list_compiles_every_phrase() {
        let set = KeywordSet::default_set().unwrap();
        assert_eq!(set.len(), DEFAULT_KEYWORDS.len());
        assert!(set.iter().all(|kw| kw == kw.to_lowercase()));
    }

    #[test]
    fn test_leadership_page_with_parenthesised_title() {
        let html = r#"<!DOCTYPE html>
<html>
  <head><title>Leadership | Acme</title></head>
  <body>
    <nav><a href="/support">Support</a></nav>
    <main>
      <h2>Our team</h2>
      <p>Dana Lee, Chief Customer Officer (CCO), joined in 2021.</p>
    </main>
  </body>
</html>"#;

        assert_eq!(
            classifier().classify(html),
            Verdict::Yes(vec![
                "chief customer".to_string(),
                "chief customer officer".to_string(),
                "chief customer officer (cco)".to_string(),
                "customer".to_string(),
            ])
        );
    }

    #[test]
    fn test_unrelated_page_is_no() {
        let html = "<html><body><h1>Rocket engines</h1><p>We build propulsion systems.</p></body></html>";
        assert_eq!(classifier().classify(html).to_string(), "NO");
    }

    #[test]
    fn test_finance_titles() {
        let html = "<p>Meet our Head of FP&amp;A and the Director of Finance.</p>";
        assert_eq!(
            classifier().classify(html).to_string(),
            "YES: director of finance, head of fp&a"
        );
    }
}
