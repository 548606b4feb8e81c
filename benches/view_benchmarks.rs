use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use convergent::prelude::*;

fn bench_orset_add(c: &mut Criterion) {
    c.bench_function("OrSet::add x1000", |b| {
        b.iter(|| {
            let mut set = OrSet::new();
            for i in 0..1000u32 {
                set.add(Tag::from(format!("t{i}")), i);
            }
            black_box(set.len())
        })
    });
}

fn bench_orset_add_remove_churn(c: &mut Criterion) {
    c.bench_function("OrSet::add+remove x500", |b| {
        b.iter(|| {
            let mut set = OrSet::new();
            for i in 0..500u32 {
                let tag = Tag::from(format!("t{i}"));
                set.add(tag.clone(), i % 10);
                set.remove(&[tag], &(i % 10));
            }
            black_box(set.len())
        })
    });
}

fn bench_register_causal_chain(c: &mut Criterion) {
    c.bench_function("Register::set chain x1000", |b| {
        b.iter(|| {
            let mut reg = Register::new();
            let mut prev: Vec<Tag> = Vec::new();
            for i in 0..1000u32 {
                let tag = Tag::from(format!("t{i}"));
                reg.set(&prev, tag.clone(), i);
                prev = vec![tag];
            }
            black_box(reg.value().copied())
        })
    });
}

fn bench_list_between_append(c: &mut Criterion) {
    c.bench_function("List::between append x1000", |b| {
        let site = SiteId::from("bench");
        b.iter(|| {
            let mut list = List::new();
            let mut last: Option<PositionalTag> = None;
            for i in 0..1000u32 {
                let tag = list.between(last.as_ref(), None, Some(&site));
                list.insert(tag.clone(), i);
                last = Some(tag);
            }
            black_box(list.len())
        })
    });
}

fn bench_list_between_same_gap(c: &mut Criterion) {
    // Worst case for identifier growth: every insert splits the same gap.
    c.bench_function("List::between same gap x200", |b| {
        let site = SiteId::from("bench");
        b.iter(|| {
            let mut list = List::new();
            let lo = list.between(None, None, Some(&site));
            list.insert(lo.clone(), 0u32);
            let mut hi = list.between(Some(&lo), None, Some(&site));
            list.insert(hi.clone(), 1);
            for i in 0..200u32 {
                let mid = list.between(Some(&lo), Some(&hi), Some(&site));
                list.insert(mid.clone(), i);
                hi = mid;
            }
            black_box(list.len())
        })
    });
}

fn bench_text_diff(c: &mut Criterion) {
    let source: String = "the quick brown fox jumps over the lazy dog. ".repeat(20);
    let mut target = source.clone();
    target.replace_range(100..110, "REPLACED!!");
    target.push_str("appended tail");

    c.bench_function("Text::diff 900 chars", |b| {
        let mut text = Text::new();
        text.update(&text.diff(&source));
        b.iter(|| black_box(text.diff(&target)))
    });
}

fn bench_text_update(c: &mut Criterion) {
    let source: String = "lorem ipsum dolor sit amet ".repeat(30);
    let mut target = source.clone();
    target.insert_str(200, "inserted in the middle ");

    c.bench_function("Text::update 800 chars", |b| {
        let mut text = Text::new();
        text.update(&text.diff(&source));
        let diff = text.diff(&target);
        b.iter(|| black_box(diff.apply_to(text.as_str())))
    });
}

criterion_group!(
    benches,
    bench_orset_add,
    bench_orset_add_remove_churn,
    bench_register_causal_chain,
    bench_list_between_append,
    bench_list_between_same_gap,
    bench_text_diff,
    bench_text_update,
);
criterion_main!(benches);
