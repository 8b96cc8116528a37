use crate::publication::PublicationRecord;

/// Render a record as a Jekyll publication page: front matter in a fixed field order, a blank
/// line, then the body. Empty optional fields are left out rather than written empty.
pub fn render(record: &PublicationRecord) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: \"{}\"", record.title),
        "collection: publications".to_string(),
        format!("category: {}", record.category),
        format!("date: {}", record.date),
        format!("permalink: /publication/{}", record.url_slug),
    ];

    if !record.authors.is_empty() {
        lines.push(format!("authors: {}", record.authors));
    }
    if !record.venue.is_empty() {
        lines.push(format!("venue: {}", record.venue));
    }
    if !record.links.is_empty() {
        lines.push("buttons:".to_string());
        for link in &record.links {
            lines.push(format!("  - type: {}", link.kind));
            lines.push(format!("    url: {}", link.url));
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());
    if !record.body.is_empty() {
        lines.push(record.body.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::{Category, Link, LinkKind};

    fn record() -> PublicationRecord {
        PublicationRecord {
            title: "Fast \\\"Thing\\\"".into(),
            authors: "Jane A. Doe, John Smith".into(),
            venue: "Proc. of Workshop on Widgets".into(),
            date: "2023-03-01".into(),
            category: Category::Conferences,
            url_slug: "fast-thing".into(),
            links: vec![
                Link {
                    kind: LinkKind::Paper,
                    url: "https://doi.org/10.1000/xyz".into(),
                },
                Link {
                    kind: LinkKind::Code,
                    url: "https://github.com/x/y".into(),
                },
            ],
            body: "We make things fast.".into(),
        }
    }

    #[test]
    fn full_record_layout() {
        let expected = "---
title: \"Fast \\\"Thing\\\"\"
collection: publications
category: conferences
date: 2023-03-01
permalink: /publication/fast-thing
authors: Jane A. Doe, John Smith
venue: Proc. of Workshop on Widgets
buttons:
  - type: paper
    url: https://doi.org/10.1000/xyz
  - type: code
    url: https://github.com/x/y
---

We make things fast.";
        assert_eq!(render(&record()), expected);
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let rec = PublicationRecord {
            authors: String::new(),
            venue: String::new(),
            links: Vec::new(),
            body: String::new(),
            ..record()
        };
        let out = render(&rec);
        assert!(!out.contains("authors:"));
        assert!(!out.contains("venue:"));
        assert!(!out.contains("buttons:"));
        assert!(out.ends_with("permalink: /publication/fast-thing\n---\n"));
    }

    #[test]
    fn title_is_valid_yaml() {
        let out = render(&record());
        let yaml = out.split("---").nth(1).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(value["title"].as_str(), Some("Fast \"Thing\""));
        assert_eq!(value["buttons"][1]["type"].as_str(), Some("code"));
    }
}
