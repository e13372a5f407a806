use std::rc::Rc;

use shared::api::UpdateTodoRequest;
use shared::models::Todo;
use uuid::Uuid;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::todo_list::TodoList;
use crate::context::{SessionContext, WebSession};
use crate::router::Route;
use crate::services::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct TodoListState {
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for TodoListState {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

pub enum TodoAction {
    Loaded(Vec<Todo>),
    Added(Todo),
    Updated(Todo),
    Removed(Uuid),
    Failed(String),
}

impl Reducible for TodoListState {
    type Action = TodoAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            TodoAction::Loaded(todos) => {
                next.todos = todos;
                next.loading = false;
                next.error = None;
            }
            TodoAction::Added(todo) => {
                next.todos.push(todo);
                next.error = None;
            }
            TodoAction::Updated(todo) => {
                if let Some(slot) = next.todos.iter_mut().find(|t| t.id == todo.id) {
                    *slot = todo;
                }
                next.error = None;
            }
            TodoAction::Removed(id) => {
                next.todos.retain(|t| t.id != id);
                next.error = None;
            }
            TodoAction::Failed(message) => {
                next.loading = false;
                next.error = Some(message);
            }
        }
        Rc::new(next)
    }
}

/// Reports a failed call. A rejected token ends the session so the user
/// lands back on the login screen.
async fn report(manager: &WebSession, state: &UseReducerDispatcher<TodoListState>, err: ClientError) {
    tracing::error!("Todo request failed: {}", err);
    if err.is_auth_rejection() {
        manager.logout().await;
    }
    state.dispatch(TodoAction::Failed(err.to_string()));
}

#[function_component(Todos)]
pub fn todos() -> Html {
    let session = use_context::<SessionContext>();
    let state = use_reducer(TodoListState::default);
    let new_title = use_state(String::new);

    let authenticated = session.as_ref().is_some_and(|s| s.authenticated);

    {
        let session = session.clone();
        let dispatcher = state.dispatcher();
        use_effect_with(authenticated, move |authenticated| {
            if let (true, Some(session)) = (*authenticated, session) {
                wasm_bindgen_futures::spawn_local(async move {
                    let manager = session.manager;
                    match manager.api().list_todos().await {
                        Ok(todos) => dispatcher.dispatch(TodoAction::Loaded(todos)),
                        Err(err) => report(&manager, &dispatcher, err).await,
                    }
                });
            }
            || ()
        });
    }

    let Some(session) = session else {
        return html! {};
    };

    if !session.authenticated {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }

    let on_title = {
        let new_title = new_title.clone();
        Callback::from(move |e: InputEvent| {
            new_title.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_add = {
        let manager = session.manager.clone();
        let dispatcher = state.dispatcher();
        let new_title = new_title.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let title = new_title.trim().to_string();
            if title.is_empty() {
                return;
            }

            let manager = manager.clone();
            let dispatcher = dispatcher.clone();
            new_title.set(String::new());
            wasm_bindgen_futures::spawn_local(async move {
                match manager.api().create_todo(&title).await {
                    Ok(todo) => dispatcher.dispatch(TodoAction::Added(todo)),
                    Err(err) => report(&manager, &dispatcher, err).await,
                }
            });
        })
    };

    let on_toggle = {
        let manager = session.manager.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |todo: Todo| {
            let manager = manager.clone();
            let dispatcher = dispatcher.clone();
            let update = UpdateTodoRequest {
                completed: Some(!todo.completed),
                ..Default::default()
            };
            wasm_bindgen_futures::spawn_local(async move {
                match manager.api().update_todo(todo.id, &update).await {
                    Ok(todo) => dispatcher.dispatch(TodoAction::Updated(todo)),
                    Err(err) => report(&manager, &dispatcher, err).await,
                }
            });
        })
    };

    let on_delete = {
        let manager = session.manager.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |id: Uuid| {
            let manager = manager.clone();
            let dispatcher = dispatcher.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match manager.api().delete_todo(id).await {
                    Ok(_) => dispatcher.dispatch(TodoAction::Removed(id)),
                    Err(err) => report(&manager, &dispatcher, err).await,
                }
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ "My Todos" }</h2>
            <form class="todo-form" onsubmit={on_add}>
                <input
                    type="text"
                    placeholder="What needs doing?"
                    value={(*new_title).clone()}
                    oninput={on_title}
                />
                <button type="submit" class="btn btn-primary">{ "Add" }</button>
            </form>
            if let Some(message) = &state.error {
                <div class="error">{ message }</div>
            }
            if state.loading {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            } else {
                <TodoList todos={state.todos.clone()} on_toggle={on_toggle} on_delete={on_delete} />
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn todo(title: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(state: TodoListState, action: TodoAction) -> TodoListState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn test_loaded_clears_loading() {
        let state = apply(TodoListState::default(), TodoAction::Loaded(vec![todo("a")]));
        assert!(!state.loading);
        assert_eq!(state.todos.len(), 1);
    }

    #[test]
    fn test_update_replaces_matching_todo_only() {
        let first = todo("a");
        let second = todo("b");
        let state = apply(
            TodoListState::default(),
            TodoAction::Loaded(vec![first.clone(), second.clone()]),
        );

        let mut done = first.clone();
        done.completed = true;
        let state = apply(state, TodoAction::Updated(done));

        assert!(state.todos[0].completed);
        assert_eq!(state.todos[1], second);
    }

    #[test]
    fn test_add_and_remove() {
        let kept = todo("keep");
        let dropped = todo("drop");
        let state = apply(TodoListState::default(), TodoAction::Loaded(vec![kept.clone()]));
        let state = apply(state, TodoAction::Added(dropped.clone()));
        assert_eq!(state.todos.len(), 2);

        let state = apply(state, TodoAction::Removed(dropped.id));
        assert_eq!(state.todos, vec![kept]);
    }

    #[test]
    fn test_failure_keeps_todos_and_sets_error() {
        let state = apply(TodoListState::default(), TodoAction::Loaded(vec![todo("a")]));
        let state = apply(state, TodoAction::Failed("Todo not found".into()));
        assert_eq!(state.error.as_deref(), Some("Todo not found"));
        assert_eq!(state.todos.len(), 1);

        let state = apply(state, TodoAction::Added(todo("b")));
        assert!(state.error.is_none());
    }
}
