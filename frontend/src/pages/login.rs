use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::context::SessionContext;
use crate::router::Route;

const MISSING_FIELDS: &str = "Username and password are required";

/// Local check run before any network call.
fn validate(username: &str, password: &str) -> Result<(), &'static str> {
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok(())
}

#[function_component(Login)]
pub fn login() -> Html {
    let session = use_context::<SessionContext>();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let is_register = use_state(|| false);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let Some(session) = session else {
        return html! {};
    };

    if session.authenticated {
        return html! { <Redirect<Route> to={Route::Home} /> };
    }

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            username.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            password.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_toggle_mode = {
        let is_register = is_register.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            is_register.set(!*is_register);
            error.set(None);
        })
    };

    let on_submit = {
        let manager = session.manager.clone();
        let username = username.clone();
        let password = password.clone();
        let is_register = is_register.clone();
        let error = error.clone();
        let submitting = submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let user = (*username).clone();
            let pass = (*password).clone();
            if let Err(message) = validate(&user, &pass) {
                error.set(Some(message.to_string()));
                return;
            }

            let manager = manager.clone();
            let register = *is_register;
            let error = error.clone();
            let submitting = submitting.clone();
            submitting.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                let result = if register {
                    manager.register(&user, &pass).await
                } else {
                    manager.login(&user, &pass).await
                };

                submitting.set(false);
                if let Err(err) = result {
                    error.set(Some(err.to_string()));
                }
            });
        })
    };

    let (title, submit_label, toggle_label) = if *is_register {
        ("Register", "Create account", "Already have an account? Log in")
    } else {
        ("Login", "Log in", "Need an account? Register")
    };

    html! {
        <div class="container">
            <form class="auth-form" onsubmit={on_submit}>
                <h2>{ title }</h2>
                if let Some(message) = &*error {
                    <div class="error">{ message }</div>
                }
                <input
                    type="text"
                    placeholder="Username"
                    value={(*username).clone()}
                    oninput={on_username}
                />
                <input
                    type="password"
                    placeholder="Password"
                    value={(*password).clone()}
                    oninput={on_password}
                />
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    { submit_label }
                </button>
                <button type="button" class="btn btn-link" onclick={on_toggle_mode}>
                    { toggle_label }
                </button>
            </form>
        </div>
    }
}
