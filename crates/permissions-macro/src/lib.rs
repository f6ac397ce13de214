//! # Permissions Macro
//!
//! Procedural macros for automatic permission checking in Prism handlers.
//! Supports the `#[with_permission(...)]` attribute for automatic permission validation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    Expr,
    Ident,
    ItemFn,
    Token,
};

/// Arguments for the with_permission macro
#[derive(Debug)]
enum PermissionMode {
    /// All specified permissions must be granted (AND logic)
    All(Vec<Expr>),
    /// At least one specified permission must be granted (OR logic)
    Any(Vec<Expr>),
}

impl Parse for PermissionMode {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // Check if we have a mode specifier (all/any) followed by =
        if input.peek(Ident) && input.peek2(Token![=]) {
            let ident: Ident = input.parse()?;
            let mode_name = ident.to_string();
            input.parse::<Token![=]>()?; // consume the =

            match mode_name.as_str() {
                "all" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::All(permissions))
                },
                "any" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::Any(permissions))
                },
                _ => {
                    Err(syn::Error::new(
                        ident.span(),
                        "Expected 'all' or 'any' before '='",
                    ))
                },
            }
        }
        else {
            // No mode specifier, default to 'all' and parse permission list
            let permissions = parse_permission_list(input)?;
            Ok(Self::All(permissions))
        }
    }
}

/// Parses a comma-separated list of permission expressions from the token stream.
///
/// # Arguments
///
/// * `input` - The parse stream to read permission expressions from
///
/// # Returns
///
/// A vector of parsed `Expr` representing the permissions, or an error if parsing fails
fn parse_permission_list(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let mut permissions = Vec::new();

    loop {
        if input.is_empty() {
            break;
        }

        let expr: Expr = input.parse()?;
        permissions.push(expr);

        if input.is_empty() {
            break;
        }

        input.parse::<Token![,]>()?;
    }

    if permissions.is_empty() {
        return Err(input.error("at least one permission is required"));
    }

    Ok(permissions)
}

/// Attribute macro for checking permissions on handler functions.
///
/// Injects a permission check at the top of the handler body.
/// Supports both ALL (AND) and ANY (OR) permission checking logic.
///
/// # Requirements
///
/// The handler must have a `ctx: RequestContext` (or `&RequestContext`) in scope.
/// The check needs no database access: the caller was resolved by the
/// request context middleware.
///
/// # Modes
///
/// - **all** (default): ALL permissions must be granted (AND logic)
/// - **any**: At least ONE permission must be granted (OR logic)
///
/// # Examples
///
/// ```ignore
/// use evaluation::{permissions::{Permission, SessionAction, ResultAction}, RequestContext};
/// use permissions_macro::with_permission;
///
/// #[with_permission(Permission::Sessions(SessionAction::Start))]
/// pub async fn start_session(state: &AppState, ctx: RequestContext, id: Uuid) -> Result<Json<SessionResponse>> {
///     // ...
/// }
///
/// #[with_permission(any = Permission::Results(ResultAction::ReadAll), Permission::Results(ResultAction::ReadOwn))]
/// pub async fn receiver_results(state: &AppState, ctx: RequestContext, id: Uuid) -> Result<Json<ReceiverReport>> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn with_permission(args: TokenStream, input: TokenStream) -> TokenStream {
    let mode = parse_macro_input!(args as PermissionMode);
    let mut input_fn = parse_macro_input!(input as ItemFn);

    let permission_check = match mode {
        PermissionMode::All(permissions) => generate_permission_check(&permissions, quote!(check_all)),
        PermissionMode::Any(permissions) => generate_permission_check(&permissions, quote!(check_any)),
    };

    let original_block = input_fn.block;
    let new_block = quote! {
        {
            #permission_check
            #original_block
        }
    };

    match syn::parse2(new_block) {
        Ok(block) => input_fn.block = Box::new(block),
        Err(err) => return err.to_compile_error().into(),
    }

    quote!(#input_fn).into()
}

/// Generate the check; `method` is `check_all` or `check_any` on `PermissionService`.
fn generate_permission_check(permissions: &[Expr], method: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    let permission_exprs = permissions.iter().map(|expr| quote! { #expr });

    quote! {
        let required_permissions = [
            #(#permission_exprs),*
        ];

        match evaluation::permissions::PermissionService::#method(&ctx, &required_permissions) {
            evaluation::permissions::PermissionCheckResult::Allowed => {},
            evaluation::permissions::PermissionCheckResult::Denied => {
                let names = required_permissions
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::warn!(request_id = %ctx.request_id, permissions = %names, "Permission denied");
                return Err(error::AppError::forbidden(
                    format!("Missing required permission: {}", names)
                ));
            },
            evaluation::permissions::PermissionCheckResult::Unauthenticated => {
                return Err(error::AppError::unauthorized("User not authenticated"));
            },
        }
    }
}
