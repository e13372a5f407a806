use yew::prelude::*;
use yew_router::prelude::*;

use crate::context::SessionContext;
use crate::router::Route;

#[function_component(Header)]
pub fn header() -> Html {
    let session = use_context::<SessionContext>();
    let navigator = use_navigator();

    let authenticated = session.as_ref().is_some_and(|s| s.authenticated);

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(session) = session.clone() else {
                return;
            };
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session.manager.logout().await;
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Login);
                }
            });
        })
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{ "Todo List" }</h1>
                <nav>
                    if authenticated {
                        <>
                            <Link<Route> to={Route::Home}>{ "Todos" }</Link<Route>>
                            { " | " }
                            <button class="btn btn-link" onclick={on_logout}>{ "Logout" }</button>
                        </>
                    } else {
                        <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                    }
                </nav>
            </div>
        </header>
    }
}
