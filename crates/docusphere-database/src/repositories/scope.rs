//! SQL rendering of [`AccessScope`].

use uuid::Uuid;

use docusphere_entity::access::AccessScope;

/// Render the scope as a boolean SQL expression over `owner_id`,
/// `shared_with` and `is_public`, reading the account from parameter
/// `$param`.
///
/// The parameter is always bound (see [`scope_param`]) so that the
/// positions of the following parameters do not depend on the scope.
pub(crate) fn scope_clause(scope: AccessScope, param: usize) -> String {
    match scope {
        AccessScope::Visible { .. } => {
            format!("(owner_id = ${param} OR ${param} = ANY(shared_with) OR is_public)")
        }
        AccessScope::Owned { .. } => format!("owner_id = ${param}"),
        AccessScope::Unrestricted => format!("${param}::uuid IS NULL"),
    }
}

/// The value bound for the scope parameter.
pub(crate) fn scope_param(scope: AccessScope) -> Option<Uuid> {
    scope.account()
}
