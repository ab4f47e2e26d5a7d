#[cfg(test)]
mod test_battle_scenarios;
