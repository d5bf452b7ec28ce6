/// Drops markup tags (HeadHunter wraps matches in `<highlighttext>`) and
/// decodes the handful of entities the job boards emit.
pub fn strip_html(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut inside_tag = false;

    for c in input.chars() {
        match c {
            '<' => inside_tag = true,
            '>' => inside_tag = false,
            c if !inside_tag => result.push(c),
            _ => {}
        }
    }

    result
        .trim()
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Title-cases a city name the way the job boards spell them, treating
/// hyphen-separated parts as separate words: `rostov-na-donu` becomes
/// `Rostov-Na-Donu`.
pub fn normalize_city_name(city: &str) -> String {
    city.trim()
        .split('-')
        .map(|part| {
            part.trim()
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapses line breaks so a value fits on one labeled line.
pub fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_highlight() {
        assert_eq!(
            strip_html("Develop <highlighttext>Rust</highlighttext> services"),
            "Develop Rust services"
        );
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("R&amp;D &quot;core&quot;&nbsp;team"), "R&D \"core\" team");
    }

    #[test]
    fn test_strip_html_plain_text_untouched() {
        assert_eq!(strip_html("  plain text  "), "plain text");
    }

    #[test]
    fn test_normalize_city_name() {
        assert_eq!(normalize_city_name("moscow"), "Moscow");
        assert_eq!(normalize_city_name("SAINT PETERSBURG"), "Saint Petersburg");
        assert_eq!(normalize_city_name("rostov-na-donu"), "Rostov-Na-Donu");
        assert_eq!(normalize_city_name("москва"), "Москва");
        assert_eq!(normalize_city_name(""), "");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("first\n\n  second\r\nthird"), "first second third");
        assert_eq!(single_line("unchanged"), "unchanged");
    }
}
