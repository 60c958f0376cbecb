//! Вложенные динамические формы: группы, в каждой — список объявлений.

use crate::shared::dynamic_list::DynamicList;
use crate::shared::signal_form::SignalForm;
use leptos::prelude::*;
use serde_json::{json, Map, Value};
use thaw::*;

type AdList = RwSignal<DynamicList<()>>;

#[component]
fn AdField(form: SignalForm, name: String, placeholder: &'static str) -> impl IntoView {
    let value = form.bind_text(name);
    view! { <Input value=value placeholder=placeholder /> }
}

#[component]
fn GroupCard(form: SignalForm, group_key: u64, ads: AdList) -> impl IntoView {
    let group_name = form.bind_text(format!("params.{group_key}.name"));

    view! {
        <div style="border: 1px solid #e8e8e8; padding: 16px; margin-bottom: 16px;">
            <Input value=group_name placeholder="Please enter group name" />
            <For
                each=move || ads.with(|list| (0..list.len()).filter_map(|i| list.get_key(i)).collect::<Vec<_>>())
                key=|ad_key| *ad_key
                children=move |ad_key| {
                    let prefix = format!("params.{group_key}.list.{ad_key}");
                    view! {
                        <div style="margin: 8px 0; display: flex; gap: 8px;">
                            <AdField form=form name=format!("{prefix}.name") placeholder="advertisement name" />
                            <AdField form=form name=format!("{prefix}.value") placeholder="times/day" />
                            <Button on_click=move |_| {
                                ads.update(|list| {
                                    if let Some(index) = list.get_index(ad_key) {
                                        list.remove(index);
                                    }
                                });
                            }>"−"</Button>
                        </div>
                    }
                }
            />
            <Button block=true on_click=move |_| { ads.update(|list| { list.push(()); }); }>
                "Add advertisement"
            </Button>
        </div>
    }
}

/// Значения формы в порядке списков: плоские имена `params.<g>.list.<a>.<field>`
/// собираются в массив групп
fn collect(form: SignalForm, groups: &DynamicList<AdList>) -> Value {
    let mut by_group = Map::new();
    for (index, ads) in groups.items().iter().enumerate() {
        let Some(group_key) = groups.get_key(index) else {
            continue;
        };
        let mut by_ad = Map::new();
        ads.with_untracked(|list| {
            for i in 0..list.len() {
                if let Some(ad_key) = list.get_key(i) {
                    let prefix = format!("params.{group_key}.list.{ad_key}");
                    by_ad.insert(
                        ad_key.to_string(),
                        json!({
                            "name": form.value(&format!("{prefix}.name")),
                            "value": form.value(&format!("{prefix}.value")),
                        }),
                    );
                }
            }
        });
        let list = ads.with_untracked(|list| list.sort_form(&Value::Object(by_ad)));
        by_group.insert(
            group_key.to_string(),
            json!({
                "name": form.value(&format!("params.{group_key}.name")),
                "list": list,
            }),
        );
    }
    Value::Array(groups.sort_form(&Value::Object(by_group)))
}

#[component]
pub fn DynamicListDemo() -> impl IntoView {
    let form = SignalForm::new();
    let groups = RwSignal::new(DynamicList::new(vec![RwSignal::new(DynamicList::new(vec![()]))]));
    let result = RwSignal::new(String::new());

    let submit = move |_| {
        let values = groups.with_untracked(|g| collect(form, g));
        result.set(serde_json::to_string_pretty(&values).unwrap_or_default());
    };

    view! {
        <div>
            <For
                each=move || groups.with(|g| {
                    (0..g.len())
                        .filter_map(|i| Some((g.get_key(i)?, g.items()[i])))
                        .collect::<Vec<_>>()
                })
                key=|(group_key, _)| *group_key
                children=move |(group_key, ads)| view! { <GroupCard form=form group_key=group_key ads=ads /> }
            />
            <Flex gap=FlexGap::Small>
                <Button on_click=move |_| {
                    groups.update(|g| { g.push(RwSignal::new(DynamicList::new(vec![()]))); });
                }>"Add Group"</Button>
                <Button appearance=ButtonAppearance::Primary on_click=submit>"Submit"</Button>
            </Flex>
            <pre>{move || result.get()}</pre>
        </div>
    }
}
