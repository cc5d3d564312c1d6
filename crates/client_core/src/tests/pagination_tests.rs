use super::*;
use shared::domain::OrderId;

use super::PageToken::{Ellipsis, Page};

fn orders(count: usize) -> Vec<OrderSummary> {
    (1..=count)
        .map(|id| OrderSummary {
            order_id: OrderId(id as i64),
            order_number: format!("SO-{id}"),
            order_date: String::new(),
            customer_name: String::new(),
            customer_company: String::new(),
            total_due: 0.0,
            created_at: String::new(),
        })
        .collect()
}

fn ids(list: &OrderList) -> Vec<i64> {
    list.visible().iter().map(|order| order.order_id.0).collect()
}

#[test]
fn short_runs_list_every_page() {
    assert_eq!(page_numbers(1, 0), Vec::<PageToken>::new());
    assert_eq!(page_numbers(1, 1), vec![Page(1)]);
    assert_eq!(page_numbers(2, 3), vec![Page(1), Page(2), Page(3)]);
    assert_eq!(
        page_numbers(5, 5),
        vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
    );
}

#[test]
fn long_runs_collapse_around_the_current_page() {
    assert_eq!(
        page_numbers(5, 12),
        vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(12)]
    );
    assert_eq!(page_numbers(1, 12), vec![Page(1), Page(2), Ellipsis, Page(12)]);
    assert_eq!(
        page_numbers(3, 12),
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(12)]
    );
    assert_eq!(
        page_numbers(10, 12),
        vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Page(12)]
    );
    assert_eq!(page_numbers(12, 12), vec![Page(1), Ellipsis, Page(11), Page(12)]);
}

#[test]
fn windows_the_list_by_page_size() {
    let mut list = OrderList::new(10);
    assert!(list.is_empty());
    list.replace(orders(23));
    assert!(!list.is_empty());

    assert_eq!(list.total_pages(), 3);
    assert_eq!(ids(&list), (1..=10).collect::<Vec<_>>());

    assert_eq!(list.set_page(3), 3);
    assert_eq!(ids(&list), vec![21, 22, 23]);
}

#[test]
fn page_moves_are_clamped() {
    let mut list = OrderList::new(10);
    list.replace(orders(15));

    assert_eq!(list.previous_page(), 1);
    assert_eq!(list.next_page(), 2);
    assert_eq!(list.next_page(), 2);
    assert_eq!(list.set_page(0), 1);
    assert_eq!(list.set_page(99), 2);
}

#[test]
fn shrinking_past_the_current_page_resets_to_first() {
    let mut list = OrderList::new(10);
    list.replace(orders(35));
    list.set_page(4);

    list.replace(orders(25));
    assert_eq!(list.current_page(), 1);

    list.set_page(3);
    list.replace(orders(21));
    assert_eq!(list.current_page(), 3);
}

#[test]
fn emptied_list_keeps_page_and_shows_nothing() {
    let mut list = OrderList::new(10);
    list.replace(orders(15));
    list.set_page(2);

    list.replace(Vec::new());

    assert!(list.is_empty());
    assert_eq!(list.total_pages(), 0);
    assert_eq!(list.current_page(), 2);
    assert!(list.visible().is_empty());
    assert!(list.page_numbers().is_empty());
}

#[test]
fn zero_page_size_is_treated_as_one() {
    let mut list = OrderList::new(0);
    list.replace(orders(3));
    assert_eq!(list.page_size(), 1);
    assert_eq!(list.total_pages(), 3);
}
