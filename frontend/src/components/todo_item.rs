use shared::models::Todo;
use uuid::Uuid;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TodoItemProps {
    pub todo: Todo,
    pub on_toggle: Callback<Todo>,
    pub on_delete: Callback<Uuid>,
}

#[function_component(TodoItem)]
pub fn todo_item(props: &TodoItemProps) -> Html {
    let todo = &props.todo;

    let toggle = {
        let on_toggle = props.on_toggle.clone();
        let todo = todo.clone();
        Callback::from(move |_| on_toggle.emit(todo.clone()))
    };

    let delete = {
        let on_delete = props.on_delete.clone();
        let id = todo.id;
        Callback::from(move |_| on_delete.emit(id))
    };

    let title_class = if todo.completed {
        "todo-title completed"
    } else {
        "todo-title"
    };

    html! {
        <div class="todo-item">
            <input
                type="checkbox"
                class="todo-checkbox"
                checked={todo.completed}
                onclick={toggle}
            />
            <div class="todo-content">
                <div class={title_class}>{ &todo.title }</div>
            </div>
            <button class="btn btn-danger" onclick={delete}>{ "Delete" }</button>
        </div>
    }
}
