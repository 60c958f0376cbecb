use crate::demos::{ClickAwayDemo, DynamicListDemo, FormTableDemo};
use leptos::prelude::*;
use thaw::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum DemoTab {
    FormTable,
    ClickAway,
    DynamicList,
}

impl DemoTab {
    const ALL: [DemoTab; 3] = [DemoTab::FormTable, DemoTab::ClickAway, DemoTab::DynamicList];

    fn title(self) -> &'static str {
        match self {
            DemoTab::FormTable => "Form and Table",
            DemoTab::ClickAway => "Click Away",
            DemoTab::DynamicList => "Dynamic List",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let active = RwSignal::new(DemoTab::FormTable);

    view! {
        <div style="padding: 24px;">
            <Flex gap=FlexGap::Small style="margin-bottom: 24px;">
                {DemoTab::ALL.into_iter().map(|tab| view! {
                    <Button
                        appearance=move || if active.get() == tab { ButtonAppearance::Primary } else { ButtonAppearance::Secondary }
                        on_click=move |_| active.set(tab)
                    >
                        {tab.title()}
                    </Button>
                }).collect_view()}
            </Flex>
            // вкладка пересоздаётся при переключении: так проверяется восстановление из кэша
            {move || match active.get() {
                DemoTab::FormTable => view! { <FormTableDemo /> }.into_any(),
                DemoTab::ClickAway => view! { <ClickAwayDemo /> }.into_any(),
                DemoTab::DynamicList => view! { <DynamicListDemo /> }.into_any(),
            }}
        </div>
    }
}
