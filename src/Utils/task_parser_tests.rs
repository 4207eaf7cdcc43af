/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests:
Basic parsing test
Mixed type parsing test
Quoted values test
Comments test
Template usage test
Empty and malformed document tests
Grapher task document test
*/

#[cfg(test)]
mod tests1 {

    use crate::Utils::task_parser::{
        Value, filter_comments, parse_document, parse_document_as, parse_document_with_template,
        parse_key, parse_key_value_pair, parse_section, parse_title, parse_value, parse_value_list,
    };
    use std::collections::HashMap;

    #[test]
    fn test_parse_title() {
        // Basic title
        let (remaining, title) = parse_title("title1\n key1: value1").unwrap();
        assert_eq!(title, "title1");
        assert_eq!(remaining, "key1: value1");

        // Title with underscore
        let (remaining, title) = parse_title("title_with_underscore key1: value1").unwrap();
        assert_eq!(title, "title_with_underscore");
        assert_eq!(remaining, "key1: value1");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("root_precision: 2").unwrap();
        assert_eq!(key, "root_precision");
        assert_eq!(remaining, ": 2");

        // Key with numbers
        let (remaining, key) = parse_key("key123: value1").unwrap();
        assert_eq!(key, "key123");
        assert_eq!(remaining, ": value1");
    }

    #[test]
    fn test_parse_value() {
        // String value
        let (remaining, value) = parse_value("fill, value2").unwrap();
        assert_eq!(value, Value::String("fill".to_string()));
        assert_eq!(remaining, ", value2");

        // Integer value
        let (remaining, value) = parse_value("-3 upper").unwrap();
        assert_eq!(value, Value::Integer(-3));
        assert_eq!(remaining, " upper");

        // Float value
        let (remaining, value) = parse_value("0.01, next").unwrap();
        assert_eq!(value, Value::Float(0.01));
        assert_eq!(remaining, ", next");

        // Boolean value
        let (remaining, value) = parse_value("true, next").unwrap();
        assert_eq!(value, Value::Boolean(true));
        assert_eq!(remaining, ", next");

        // unquoted formula without spaces
        let (remaining, value) = parse_value("sin(x)+1 next").unwrap();
        assert_eq!(value, Value::String("sin(x)+1".to_string()));
        assert_eq!(remaining, " next");
    }

    #[test]
    fn test_parse_quoted_value() {
        let (remaining, value) = parse_value("\"log(x, 2) + 1\", next").unwrap();
        assert_eq!(value, Value::String("log(x, 2) + 1".to_string()));
        assert_eq!(remaining, ", next");

        // quoted numbers stay strings
        let (_, value) = parse_value("\"42\"").unwrap();
        assert_eq!(value, Value::String("42".to_string()));

        // unterminated quote is an error
        assert!(parse_value("\"sin(x)").is_err());
    }

    #[test]
    fn test_parse_value_list() {
        // Mixed type list
        let (remaining, values) = parse_value_list("\"sin(x)\", 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("sin(x)".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true)
            ]
        );
        assert_eq!(remaining, "");

        // Empty list
        let (remaining, values) = parse_value_list("").unwrap();
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) =
            parse_key_value_pair("f: \"sin(x)\", \"x ^ 2\" lower: 1").unwrap();
        assert_eq!(key, "f");
        assert_eq!(
            values,
            vec![
                Value::String("sin(x)".to_string()),
                Value::String("x ^ 2".to_string())
            ]
        );
        assert_eq!(remaining, "lower: 1");

        // With spaces around the colon
        let (remaining, (key, values)) = parse_key_value_pair("step : 0.5").unwrap();
        assert_eq!(key, "step");
        assert_eq!(values, vec![Value::Float(0.5)]);
        assert_eq!(remaining, "");

        // Empty value list
        let (remaining, (key, values)) = parse_key_value_pair("key1:").unwrap();
        assert_eq!(key, "key1");
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_section() {
        let input = "domain lower: -3 upper: 3 step: 0.01";
        let (remaining, (title, map)) = parse_section(input).unwrap();

        assert_eq!(title, "domain");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("lower").unwrap(), &vec![Value::Integer(-3)]);
        assert_eq!(map.get("step").unwrap(), &vec![Value::Float(0.01)]);
        assert_eq!(remaining, "");

        // Section with trailing text
        let input = "section1 key1: value1, value2 key2: value3, value4 section2";
        let (remaining, (title, map)) = parse_section(input).unwrap();
        assert_eq!(title, "section1");
        assert_eq!(map.len(), 2);
        assert_eq!(remaining, "section2");
    }

    #[test]
    fn test_parse_document_basic() {
        let input = "section1 key1: value1, value2 key2: value3\nsection2 key3: value4, value5";
        let (remaining, doc) = parse_document(input).unwrap();
        assert_eq!(doc.len(), 2);

        let section1 = &doc["section1"];
        assert_eq!(section1.len(), 2);
        assert_eq!(
            section1.get("key1").unwrap().as_ref().unwrap(),
            &vec![
                Value::String("value1".to_string()),
                Value::String("value2".to_string())
            ]
        );

        let section2 = &doc["section2"];
        assert_eq!(
            section2.get("key3").unwrap().as_ref().unwrap(),
            &vec![
                Value::String("value4".to_string()),
                Value::String("value5".to_string())
            ]
        );
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_document_with_multiple_line_breaks() {
        let input = "section1\n key1: value1, value2\n\n\nsection2\n   key2: value3, value4";
        let (remaining, doc) = parse_document(input).unwrap();

        assert_eq!(doc.len(), 2);
        assert!(doc.contains_key("section1"));
        assert!(doc.contains_key("section2"));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_filter_comments() {
        let input = "# header\nformulas\n  // a note\n  f: \"sin(x)\"\n% matlab style\n; ini style\n\n";
        assert_eq!(filter_comments(input), "formulas\n  f: \"sin(x)\"");
    }

    #[test]
    fn test_parse_document_as_drops_comments() {
        let input = "# plot setup\nformulas\n    f: \"sin(x)\", cosx\n// domain\ndomain\n    lower: -1 upper: 1 step: 0.5";
        let doc = parse_document_as(input, None).unwrap();
        assert_eq!(
            doc["formulas"]["f"].as_ref().unwrap(),
            &vec![
                Value::String("sin(x)".to_string()),
                Value::String("cosx".to_string())
            ]
        );
        assert_eq!(
            doc["domain"]["upper"].as_ref().unwrap(),
            &vec![Value::Integer(1)]
        );
    }

    #[test]
    fn test_parse_document_empty() {
        assert!(parse_document("").is_err());
        assert!(parse_document_as("# only a comment", None).is_err());
    }

    #[test]
    fn test_parse_document_malformed() {
        let result = parse_document_as("formulas f: \"sin(x)\" $$$", None);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Remaining"));
    }

    #[test]
    fn test_parse_document_with_template() {
        let mut template = HashMap::new();
        let mut domain = HashMap::new();
        domain.insert("lower".to_string(), None);
        domain.insert("upper".to_string(), None);
        domain.insert("step".to_string(), None); // Not in the input
        let mut logging = HashMap::new();
        logging.insert("loglevel".to_string(), None);
        template.insert("domain".to_string(), domain);
        template.insert("logging".to_string(), logging);

        let input = "domain lower: 0 upper: 10";
        let result = parse_document_with_template(input, &template).unwrap();

        assert_eq!(
            result["domain"]["lower"].as_ref().unwrap(),
            &vec![Value::Integer(0)]
        );
        assert_eq!(result["domain"]["step"], None);
        assert_eq!(result["logging"]["loglevel"], None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(-3).as_number(), Some(-3.0));
        assert_eq!(Value::Float(0.5).as_number(), Some(0.5));
        assert_eq!(Value::Boolean(true).as_number(), None);
        assert_eq!(Value::Integer(2).as_float(), None);
        assert_eq!(Value::Boolean(false).as_boolean(), Some(false));
        assert_eq!(
            Value::String("x".to_string()).as_string(),
            Some(&"x".to_string())
        );
        assert_eq!(Value::Float(1.5).to_string_value(), "1.5");
    }
}
