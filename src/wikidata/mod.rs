//! Wikidata SPARQL source.
//!
//! One POST per run against the public query service; the query selects humans
//! with an image and a height statement, limited to well-known people (more
//! than 100 sitelinks).

pub mod client;

pub const WIKIDATA_SPARQL_URL: &str = "https://query.wikidata.org/sparql";

/// Versioned with the crate so the service can identify us.
pub const USER_AGENT: &str = concat!("heightsync/", env!("CARGO_PKG_VERSION"));

/// Capped at 500 rows: without an explicit limit the service applies a much
/// lower one of its own.
pub const PEOPLE_HEIGHT_QUERY: &str = r#"SELECT DISTINCT ?item ?itemLabel ?itemDescription ?sitelinks ?image ?heightValue ?heightUnitLabel
WHERE {
?item wdt:P31 wd:Q5; wdt:P18 ?image; wikibase:sitelinks ?sitelinks.
FILTER(?sitelinks > 100)
?item p:P2048 ?heightStatement.
?heightStatement psn:P2048 ?heightNode.
?heightNode wikibase:quantityAmount ?heightValue.
?heightNode wikibase:quantityUnit ?heightUnit.
SERVICE wikibase:label {
bd:serviceParam wikibase:language "en".
?item rdfs:label ?itemLabel.
?item schema:description ?itemDescription.
?heightUnit rdfs:label ?heightUnitLabel.
}
}
ORDER BY DESC(?sitelinks)
LIMIT 500"#;
