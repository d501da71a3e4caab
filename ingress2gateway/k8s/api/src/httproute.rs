pub use gateway_api::apis::standard::httproutes::{
    HTTPRoute, HTTPRouteParentRefs, HTTPRouteRules, HTTPRouteRulesBackendRefs,
    HTTPRouteRulesMatches, HTTPRouteRulesMatchesHeaders, HTTPRouteRulesMatchesHeadersType,
    HTTPRouteRulesMatchesPath, HTTPRouteRulesMatchesPathType, HTTPRouteSpec, HTTPRouteStatus,
};

/// References a Gateway by name in the route's own namespace.
pub fn parent_gateway(name: impl Into<String>) -> HTTPRouteParentRefs {
    HTTPRouteParentRefs {
        name: name.into(),
        ..Default::default()
    }
}

/// Returns the first header match for `name` in a route match.
pub fn header_match<'m>(
    route_match: &'m HTTPRouteRulesMatches,
    name: &str,
) -> Option<&'m HTTPRouteRulesMatchesHeaders> {
    route_match
        .headers
        .iter()
        .flatten()
        .find(|header| header.name == name)
}
