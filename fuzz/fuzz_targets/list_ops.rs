#![no_main]

mod common;

use std::mem;

use libfuzzer_sys::fuzz_target;

use crate::common::{
  ListOp,
  assert_normalized,
  selection_within,
  session_from_bytes,
};

fuzz_target!(|data: &[u8]| {
  let Some(mut session) = session_from_bytes(data) else {
    return;
  };

  for op in mem::take(&mut session.ops) {
    let list = &mut session.list;
    let len = list.len();
    match op {
      ListOp::Insert { index } => {
        let index = index as usize % (len + 1);
        let id = session.next_id.to_string();
        session.next_id += 1;
        list.insert(id, index).unwrap();
      },
      ListOp::RemoveFrom { ranges } => {
        if let Some(removal) = selection_within(&ranges, 0, len) {
          let size = removal.size();
          list.remove_from(removal).unwrap();
          assert_eq!(list.len(), len - size);
        }
      },
      ListOp::Move { ranges, to } => {
        if let Some(source) = selection_within(&ranges, 0, len) {
          let before: Vec<String> = list.selected().iter().map(|item| item.content().clone()).collect();
          list.move_items(source, to as usize % (len + 1)).unwrap();
          assert_eq!(list.len(), len);

          let mut after: Vec<String> =
            list.selected().iter().map(|item| item.content().clone()).collect();
          let mut before = before;
          before.sort();
          after.sort();
          assert_eq!(before, after, "move changed the selected items");
        }
      },
      ListOp::Select { ranges, main } => {
        let selection = selection_within(&ranges, main, len);
        let single = list.options().is_single();
        let result = list.select(selection.clone());
        match selection {
          Some(selection) if single && selection.size() > 1 => assert!(result.is_err()),
          _ => result.unwrap(),
        }
      },
      ListOp::Clear => list.select(None).unwrap(),
    }

    if let Some(selection) = session.list.selection() {
      assert_normalized(selection, session.list.len());
      if session.list.options().is_single() {
        assert!(selection.size() <= 1);
      }
    }
  }
});
