//! Форма поиска (простая/расширенная) + таблица пользователей randomuser.me

use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::form_table::{use_form_table, FormTable, FormTableOptions};
use crate::shared::session_cache::SessionCache;
use crate::shared::signal_form::SignalForm;
use contracts::shared::search_table::{InvocationRecord, PagedData, SearchMode};
use gloo_net::http::Request;
use leptos::prelude::*;
use serde::Deserialize;
use thaw::*;

const CACHE_KEY: &str = "form_table_demo";

#[derive(Clone, Debug, Deserialize)]
pub struct UserName {
    pub last: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RandomUser {
    pub name: UserName,
    pub email: String,
    pub phone: String,
    pub gender: String,
}

#[derive(Deserialize)]
struct RandomUserInfo {
    results: u64,
}

#[derive(Deserialize)]
struct RandomUserResponse {
    info: RandomUserInfo,
    results: Vec<RandomUser>,
}

async fn fetch_users(record: InvocationRecord) -> Result<PagedData<RandomUser>, String> {
    let mut url = format!(
        "https://randomuser.me/api?results=55&page={}&size={}",
        record.pagination.current, record.pagination.page_size
    );
    for (field, value) in &record.fields {
        if let Some(value) = value.as_str().filter(|v| !v.is_empty()) {
            url.push_str(&format!("&{}={}", field, urlencoding::encode(value)));
        }
    }
    log::debug!("fetch users: {url}");

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }
    let body: RandomUserResponse = response.json().await.map_err(|e| e.to_string())?;

    Ok(PagedData {
        total: body.info.results,
        list: body.results,
    })
}

#[component]
fn SimpleSearch(form: SignalForm, table: FormTable<RandomUser>) -> impl IntoView {
    let gender = form.bind_text("gender");
    let name = form.bind_text("name");

    view! {
        <Flex gap=FlexGap::Medium justify=FlexJustify::End style="margin-bottom: 16px;">
            <select
                style="width: 120px;"
                prop:value=move || gender.get()
                on:change=move |ev| {
                    gender.set(event_target_value(&ev));
                    table.submit();
                }
            >
                <option value="">"all"</option>
                <option value="male">"male"</option>
                <option value="female">"female"</option>
            </select>
            <form on:submit=move |ev| table.submit_event(&ev)>
                <Input value=name placeholder="enter name" />
            </form>
            <Button appearance=ButtonAppearance::Transparent on_click=move |_| table.change_type()>
                "Advanced Search"
            </Button>
        </Flex>
    }
}

#[component]
fn AdvanceSearch(form: SignalForm, table: FormTable<RandomUser>) -> impl IntoView {
    let name = form.bind_text("name");
    let email = form.bind_text("email");
    let phone = form.bind_text("phone");

    view! {
        <form on:submit=move |ev| table.submit_event(&ev)>
            <Flex gap=FlexGap::Medium style="margin-bottom: 16px;">
                <Input value=name placeholder="name" />
                <Input value=email placeholder="email" />
                <Input value=phone placeholder="phone" />
            </Flex>
            <Flex gap=FlexGap::Small justify=FlexJustify::End>
                <Button appearance=ButtonAppearance::Primary on_click=move |_| table.submit()>
                    "Search"
                </Button>
                <Button on_click=move |_| table.reset()>"Reset"</Button>
                <Button appearance=ButtonAppearance::Transparent on_click=move |_| table.change_type()>
                    "Simple Search"
                </Button>
            </Flex>
        </form>
    }
}

#[component]
pub fn FormTableDemo() -> impl IntoView {
    let form = SignalForm::new();
    let table = use_form_table(
        form,
        fetch_users,
        FormTableOptions::default()
            .with_default_page_size(5)
            .with_cache_key(CACHE_KEY),
    );

    // Следующий заход на вкладку восстановит страницу и фильтры
    on_cleanup(|| SessionCache::browser().activate(CACHE_KEY, false));

    let rows = move || table.data.with(|d| d.as_ref().map(|d| d.list.clone()).unwrap_or_default());

    view! {
        <div>
            {move || match table.mode.get() {
                SearchMode::Simple => view! { <SimpleSearch form=form table=table /> }.into_any(),
                SearchMode::Advance => view! { <AdvanceSearch form=form table=table /> }.into_any(),
            }}

            {move || table.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"name"</TableHeaderCell>
                        <TableHeaderCell>"email"</TableHeaderCell>
                        <TableHeaderCell>"phone"</TableHeaderCell>
                        <TableHeaderCell>"gender"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || rows().into_iter().map(|user| view! {
                        <TableRow>
                            <TableCell><TableCellLayout>{user.name.last}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{user.email}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{user.phone}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{user.gender}</TableCellLayout></TableCell>
                        </TableRow>
                    }).collect_view()}
                </TableBody>
            </Table>

            {move || table.loading.get().then(|| view! { <Spinner /> })}

            <PaginationControls
                current=table.current()
                total_pages=table.total_pages()
                total=table.total()
                page_size=table.page_size()
                on_change=Callback::new(move |(current, page_size)| table.change_page(current, page_size))
            />
        </div>
    }
}
