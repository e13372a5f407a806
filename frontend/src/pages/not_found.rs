use yew::prelude::*;
use yew_router::prelude::*;

use crate::context::SessionContext;
use crate::router::Route;

/// Where to send someone who followed a dead link.
fn way_back(authenticated: bool) -> (Route, &'static str) {
    if authenticated {
        (Route::Home, "Back to your todos")
    } else {
        (Route::Login, "Log in")
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    let authenticated = use_context::<SessionContext>().is_some_and(|s| s.authenticated);
    let path = use_location().map(|l| l.path().to_string()).unwrap_or_default();
    let (target, label) = way_back(authenticated);

    html! {
        <div class="container">
            <div class="empty-state">
                <h2>{ "Nothing here" }</h2>
                if !path.is_empty() {
                    <p><code>{ path }</code>{ " does not match any page." }</p>
                }
                <Link<Route> to={target}>{ label }</Link<Route>>
            </div>
        </div>
    }
}
